use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::field::{blank, digits, numeric, routing_code, text, TextPolicy};
use super::{CREDIT_CODE, DETAIL_TYPE, FOOTER_ROUTING_CODE, FOOTER_TYPE, HEADER_TYPE, LINE_WIDTH};
use crate::batch::{partition, PaymentBatch, PaymentItem};
use crate::config::Originator;
use crate::error::{AbaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileOptions {
    pub line_ending: LineEnding,
    pub text: TextPolicy,
}

/// Control totals carried by the file-total record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub record_count: usize,
    pub credit_total: u64,
    pub debit_total: u64,
    pub net_total: u64,
    /// Ids of items left out because their payee has no complete bank profile
    pub excluded: Vec<String>,
}

/// A fully rendered Direct Entry file
#[derive(Debug, Clone)]
pub struct DirectEntryFile {
    lines: Vec<String>,
    line_ending: LineEnding,
    summary: FileSummary,
    warnings: Vec<String>,
}

/// Render `batch` with default options: CRLF line endings, ASCII-only text.
pub fn generate(
    batch: &PaymentBatch,
    originator_routing_code: &str,
    originator_account_number: &str,
    originator_name: &str,
    description: &str,
) -> Result<Vec<u8>> {
    let originator = Originator {
        name: originator_name.to_string(),
        routing_code: originator_routing_code.to_string(),
        account_number: originator_account_number.to_string(),
        description: description.to_string(),
        institution: None,
        user_id: None,
    };
    let file = DirectEntryFile::build(batch, &originator, &FileOptions::default())?;
    Ok(file.to_bytes())
}

/// Checks a bankable item the way rendering its detail record would,
/// without rendering it
pub fn validate_item(item: &PaymentItem) -> Result<()> {
    let owner = format!("item {}", item.id);
    let amount = positive_amount(item)?;
    numeric(&format!("amount of {owner}"), amount, 10)?;
    routing_code(
        &format!("routing code of {owner}"),
        item.bank.routing_code.as_deref().unwrap_or_default(),
    )?;
    digits(
        &format!("account number of {owner}"),
        item.bank.account_number.as_deref().unwrap_or_default(),
        9,
    )?;
    Ok(())
}

fn positive_amount(item: &PaymentItem) -> Result<u64> {
    if item.amount <= 0 {
        return Err(AbaError::NonPositiveAmount {
            item: item.id.clone(),
            amount: item.amount,
        });
    }
    Ok(item.amount as u64)
}

impl DirectEntryFile {
    pub fn build(
        batch: &PaymentBatch,
        originator: &Originator,
        options: &FileOptions,
    ) -> Result<Self> {
        let mut writer = RecordWriter::new(originator, options.text)?;
        let split = partition(&batch.items);

        let mut lines = Vec::with_capacity(split.bankable.len() + 2);
        lines.push(writer.header(batch)?);

        let mut credit_total: u64 = 0;
        for item in &split.bankable {
            let (line, amount) = writer.detail(item)?;
            credit_total += amount;
            lines.push(line);
        }

        let summary = FileSummary {
            record_count: split.bankable.len(),
            credit_total,
            debit_total: 0,
            net_total: credit_total,
            excluded: split.excluded.iter().map(|i| i.id.clone()).collect(),
        };
        lines.push(footer(&summary)?);

        info!(
            "Batch {}: {} detail record(s), credit total {} cents, {} item(s) excluded",
            batch.number,
            summary.record_count,
            summary.credit_total,
            summary.excluded.len()
        );

        Ok(Self {
            lines,
            line_ending: options.line_ending,
            summary,
            warnings: writer.warnings,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> &FileSummary {
        &self.summary
    }

    /// Data-quality issues found while normalizing text fields
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Lines joined with the configured terminator; none after the footer
    pub fn to_bytes(&self) -> Vec<u8> {
        self.lines.join(self.line_ending.as_str()).into_bytes()
    }
}

/// Originator fields validated once, plus warnings collected per file
struct RecordWriter<'a> {
    originator: &'a Originator,
    routing_code: String,
    account_number: String,
    remitter: String,
    policy: TextPolicy,
    warnings: Vec<String>,
}

impl<'a> RecordWriter<'a> {
    fn new(originator: &'a Originator, policy: TextPolicy) -> Result<Self> {
        if originator.name.trim().is_empty() {
            return Err(AbaError::InvalidField {
                field: "originator name".to_string(),
                value: originator.name.clone(),
                reason: "must not be empty".to_string(),
            });
        }

        // Non-ASCII in the name is reported once, by the header
        let (remitter, _) = policy.apply(&originator.name);

        Ok(Self {
            originator,
            routing_code: routing_code("originator routing code", &originator.routing_code)?,
            account_number: digits("originator account number", &originator.account_number, 9)?,
            remitter: text(&remitter, 16),
            policy,
            warnings: Vec::new(),
        })
    }

    fn normalize(&mut self, field: &str, owner: &str, value: &str) -> String {
        let (normalized, flagged) = self.policy.apply(value);
        if flagged {
            let action = if self.policy.ascii_only { "replaced" } else { "kept" };
            let msg = format!(
                "{owner}: non-ASCII or control characters in {field} '{value}' ({action})"
            );
            warn!("{msg}");
            self.warnings.push(msg);
        }
        normalized
    }

    fn text(&mut self, field: &str, owner: &str, value: &str, width: usize) -> String {
        let normalized = self.normalize(field, owner, value);
        text(&normalized, width)
    }

    // 0 | blank 17 | reel 2 | institution 3 | blank 7 | name 26 | user id 6 |
    // description 12 | date DDMMYY 6 | full name or blank 40
    //
    // When neither the name nor the description fits its column whole, the
    // full name goes in the trailing 40 bytes so one of them stays verbatim.
    fn header(&mut self, batch: &PaymentBatch) -> Result<String> {
        let originator = self.originator;
        let mut line = String::with_capacity(LINE_WIDTH);

        line.push(HEADER_TYPE);
        line.push_str(&blank(17));
        line.push_str("01");
        let institution = originator.institution.as_deref().unwrap_or("");
        line.push_str(&self.text("institution", "originator", institution, 3));
        line.push_str(&blank(7));
        let name = self.normalize("name", "originator", &originator.name);
        let description = self.normalize("description", "originator", &originator.description);
        line.push_str(&text(&name, 26));
        line.push_str(&numeric("APCA user id", u64::from(originator.user_id.unwrap_or(0)), 6)?);
        line.push_str(&text(&description, 12));
        match batch.processing_date {
            Some(date) => line.push_str(&date.format("%d%m%y").to_string()),
            None => line.push_str(&blank(6)),
        }

        let description_fits = !description.is_empty() && description.len() <= 12;
        if name.len() <= 26 || description_fits {
            line.push_str(&blank(40));
        } else if name.len() <= 40 {
            line.push_str(&text(&name, 40));
        } else {
            return Err(AbaError::FieldOverflow {
                field: "header description".to_string(),
                value: originator.description.clone(),
                width: 12,
            });
        }

        debug_assert_eq!(line.len(), LINE_WIDTH);
        Ok(line)
    }

    /// Returns the rendered line and the amount it credits
    fn detail(&mut self, item: &PaymentItem) -> Result<(String, u64)> {
        let amount = positive_amount(item)?;
        let originator = self.originator;
        let owner = format!("item {}", item.id);
        let bank = &item.bank;

        let reference = item
            .reference
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(originator.description.as_str());

        let mut line = String::with_capacity(LINE_WIDTH);
        line.push(DETAIL_TYPE);
        line.push_str(&routing_code(
            &format!("routing code of {owner}"),
            bank.routing_code.as_deref().unwrap_or_default(),
        )?);
        line.push_str(&digits(
            &format!("account number of {owner}"),
            bank.account_number.as_deref().unwrap_or_default(),
            9,
        )?);
        line.push(' ');
        line.push_str(CREDIT_CODE);
        line.push_str(&numeric(&format!("amount of {owner}"), amount, 10)?);
        let account_name = bank.account_name.as_deref().unwrap_or_default();
        line.push_str(&self.text("account name", &owner, account_name, 32));
        line.push_str(&self.text("lodgement reference", &owner, reference, 18));
        line.push_str(&self.routing_code);
        line.push_str(&self.account_number);
        line.push_str(&self.remitter);
        line.push_str("00000000");

        debug_assert_eq!(line.len(), LINE_WIDTH);
        Ok((line, amount))
    }
}

fn footer(summary: &FileSummary) -> Result<String> {
    let mut line = String::with_capacity(LINE_WIDTH);

    line.push(FOOTER_TYPE);
    line.push_str(FOOTER_ROUTING_CODE);
    line.push_str(&blank(12));
    line.push_str(&numeric("net total", summary.net_total, 10)?);
    line.push_str(&numeric("credit total", summary.credit_total, 10)?);
    line.push_str(&numeric("debit total", summary.debit_total, 10)?);
    line.push_str(&blank(6));
    line.push_str(&numeric("record count", summary.record_count as u64, 6)?);
    line.push_str(&blank(58));

    debug_assert_eq!(line.len(), LINE_WIDTH);
    Ok(line)
}
