use chrono::NaiveDate;
use serde::Serialize;

use super::{
    DEBIT_CODE, DETAIL_TYPE, FOOTER_ROUTING_CODE, FOOTER_TYPE, HEADER_TYPE, LINE_WIDTH,
};
use crate::error::{AbaError, Result};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeaderRecord {
    pub reel: String,
    pub institution: String,
    pub user_name: String,
    pub user_id: String,
    pub description: String,
    pub processing_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DetailRecord {
    pub routing_code: String,
    pub account_number: String,
    pub transaction_code: String,
    pub amount: u64,
    pub account_name: String,
    pub reference: String,
    pub trace_routing_code: String,
    pub trace_account_number: String,
    pub remitter_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FooterRecord {
    pub net_total: u64,
    pub credit_total: u64,
    pub debit_total: u64,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedFile {
    pub header: HeaderRecord,
    pub details: Vec<DetailRecord>,
    pub footer: FooterRecord,
}

/// Parse a Direct Entry file and check its control totals.
///
/// Accepts CRLF or LF terminators and at most one trailing terminator.
/// Every record must be exactly 120 bytes.
pub fn read_file(bytes: &[u8]) -> Result<ParsedFile> {
    let content = std::str::from_utf8(bytes).map_err(|e| AbaError::Malformed {
        line: 0,
        reason: format!("not valid UTF-8: {e}"),
    })?;
    let content = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content);

    let lines: Vec<&str> = content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    if lines.len() < 2 {
        return Err(AbaError::Malformed {
            line: lines.len(),
            reason: "a file needs at least a header and a file-total record".to_string(),
        });
    }

    for (idx, line) in lines.iter().enumerate() {
        let width = line.len();
        if width != LINE_WIDTH {
            return Err(AbaError::Malformed {
                line: idx + 1,
                reason: format!("expected {LINE_WIDTH} bytes, found {width}"),
            });
        }
    }

    let last = lines.len() - 1;
    let header = parse_header(lines[0])?;
    let details = lines[1..last]
        .iter()
        .enumerate()
        .map(|(idx, line)| parse_detail(idx + 2, line))
        .collect::<Result<Vec<_>>>()?;
    let footer = parse_footer(last + 1, lines[last])?;

    check_totals(last + 1, &details, &footer)?;

    Ok(ParsedFile {
        header,
        details,
        footer,
    })
}

// Columns are byte offsets; lines are already known to be LINE_WIDTH bytes
fn field(line: &str, start: usize, width: usize) -> String {
    String::from_utf8_lossy(&line.as_bytes()[start..start + width]).into_owned()
}

fn number(line_no: usize, name: &str, raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| AbaError::Malformed {
        line: line_no,
        reason: format!("{name} '{raw}' is not numeric"),
    })
}

fn expect_type(line_no: usize, line: &str, expected: char) -> Result<()> {
    match line.chars().next() {
        Some(c) if c == expected => Ok(()),
        other => Err(AbaError::Malformed {
            line: line_no,
            reason: format!(
                "expected record type '{expected}', found '{}'",
                other.unwrap_or(' ')
            ),
        }),
    }
}

fn parse_header(line: &str) -> Result<HeaderRecord> {
    expect_type(1, line, HEADER_TYPE)?;

    let raw_date = field(line, 74, 6);
    let processing_date = if raw_date.trim().is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(&raw_date, "%d%m%y").map_err(|_| AbaError::Malformed {
                line: 1,
                reason: format!("processing date '{raw_date}' is not DDMMYY"),
            })?,
        )
    };

    Ok(HeaderRecord {
        reel: field(line, 18, 2),
        institution: field(line, 20, 3).trim_end().to_string(),
        user_name: field(line, 30, 26).trim_end().to_string(),
        user_id: field(line, 56, 6),
        description: field(line, 62, 12).trim_end().to_string(),
        processing_date,
    })
}

fn parse_detail(line_no: usize, line: &str) -> Result<DetailRecord> {
    expect_type(line_no, line, DETAIL_TYPE)?;

    Ok(DetailRecord {
        routing_code: field(line, 1, 7),
        account_number: field(line, 8, 9),
        transaction_code: field(line, 18, 2),
        amount: number(line_no, "amount", &field(line, 20, 10))?,
        account_name: field(line, 30, 32).trim_end().to_string(),
        reference: field(line, 62, 18).trim_end().to_string(),
        trace_routing_code: field(line, 80, 7),
        trace_account_number: field(line, 87, 9),
        remitter_name: field(line, 96, 16).trim_end().to_string(),
    })
}

fn parse_footer(line_no: usize, line: &str) -> Result<FooterRecord> {
    expect_type(line_no, line, FOOTER_TYPE)?;

    let routing = field(line, 1, 7);
    if routing != FOOTER_ROUTING_CODE {
        return Err(AbaError::Malformed {
            line: line_no,
            reason: format!("file-total routing code is '{routing}', expected '{FOOTER_ROUTING_CODE}'"),
        });
    }

    Ok(FooterRecord {
        net_total: number(line_no, "net total", &field(line, 20, 10))?,
        credit_total: number(line_no, "credit total", &field(line, 30, 10))?,
        debit_total: number(line_no, "debit total", &field(line, 40, 10))?,
        record_count: number(line_no, "record count", &field(line, 56, 6))? as usize,
    })
}

fn check_totals(line_no: usize, details: &[DetailRecord], footer: &FooterRecord) -> Result<()> {
    let (debits, credits): (Vec<_>, Vec<_>) = details
        .iter()
        .partition(|d| d.transaction_code == DEBIT_CODE);
    let credit_total: u64 = credits.iter().map(|d| d.amount).sum();
    let debit_total: u64 = debits.iter().map(|d| d.amount).sum();

    let mismatch = |what: &str, found: u64, expected: u64| AbaError::Malformed {
        line: line_no,
        reason: format!("{what} is {found} but the detail records add up to {expected}"),
    };

    if footer.record_count != details.len() {
        return Err(mismatch(
            "record count",
            footer.record_count as u64,
            details.len() as u64,
        ));
    }
    if footer.credit_total != credit_total {
        return Err(mismatch("credit total", footer.credit_total, credit_total));
    }
    if footer.debit_total != debit_total {
        return Err(mismatch("debit total", footer.debit_total, debit_total));
    }
    let net = credit_total.abs_diff(debit_total);
    if footer.net_total != net {
        return Err(mismatch("net total", footer.net_total, net));
    }

    Ok(())
}
