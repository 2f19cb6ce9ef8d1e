//! Fixed-width field rendering for Direct Entry records.
//!
//! Widths are byte counts. Numeric fields never truncate: a value that needs
//! more digits than its column is a hard error. Text fields truncate silently,
//! never splitting a multi-byte character.

use crate::error::{AbaError, Result};

/// Right-aligned, zero-padded integer
pub fn numeric(field: &str, value: u64, width: usize) -> Result<String> {
    let rendered = value.to_string();
    if rendered.len() > width {
        return Err(AbaError::FieldOverflow {
            field: field.to_string(),
            value: rendered,
            width,
        });
    }
    Ok(format!("{rendered:0>width$}"))
}

/// Keeps only the digits of `value`, then renders them like [`numeric`].
/// Leading zeros in the input are significant and preserved.
pub fn digits(field: &str, value: &str, width: usize) -> Result<String> {
    let only: String = value.chars().filter(char::is_ascii_digit).collect();
    if only.is_empty() {
        return Err(AbaError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
            reason: "contains no digits".to_string(),
        });
    }
    if only.len() > width {
        return Err(AbaError::FieldOverflow {
            field: field.to_string(),
            value: value.to_string(),
            width,
        });
    }
    Ok(format!("{only:0>width$}"))
}

/// Left-aligned, space-padded, truncated to exactly `width` bytes
pub fn text(value: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    for ch in value.chars() {
        if out.len() + ch.len_utf8() > width {
            break;
        }
        out.push(ch);
    }
    while out.len() < width {
        out.push(' ');
    }
    out
}

pub fn blank(width: usize) -> String {
    " ".repeat(width)
}

/// Canonical 7-character BSB. Accepts "DDD-DDD" or six bare digits.
pub fn routing_code(field: &str, value: &str) -> Result<String> {
    let v = value.trim();
    let b = v.as_bytes();

    let canonical = match b.len() {
        7 if b[3] == b'-'
            && b[..3].iter().all(u8::is_ascii_digit)
            && b[4..].iter().all(u8::is_ascii_digit) =>
        {
            Some(v.to_string())
        }
        6 if b.iter().all(u8::is_ascii_digit) => Some(format!("{}-{}", &v[..3], &v[3..])),
        _ => None,
    };

    canonical.ok_or_else(|| AbaError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected a BSB in DDD-DDD form".to_string(),
    })
}

/// Normalization applied to text fields before they are truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPolicy {
    pub uppercase: bool,
    /// Replace non-ASCII characters with spaces instead of keeping them
    pub ascii_only: bool,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            uppercase: false,
            ascii_only: true,
        }
    }
}

impl TextPolicy {
    /// Returns the normalized text and whether it held non-ASCII or control
    /// characters. Control characters are always replaced with spaces.
    pub fn apply(&self, value: &str) -> (String, bool) {
        let mut flagged = false;
        let mut out = String::with_capacity(value.len());

        for ch in value.trim().chars() {
            let ch = if ch.is_control() {
                flagged = true;
                ' '
            } else if !ch.is_ascii() {
                flagged = true;
                if self.ascii_only {
                    ' '
                } else {
                    ch
                }
            } else if self.uppercase {
                ch.to_ascii_uppercase()
            } else {
                ch
            };
            out.push(ch);
        }

        (out, flagged)
    }
}
