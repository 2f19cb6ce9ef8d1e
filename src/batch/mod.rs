mod filter;

pub use filter::{bankable_items, partition, Partition};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of an approved payment batch
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentBatch {
    pub id: String,
    /// Human-readable batch number (e.g., PB-2026-0042)
    pub number: String,
    /// Emission order in the generated file
    #[serde(default)]
    pub items: Vec<PaymentItem>,
    /// Informational only; the file recomputes its own totals
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub processing_date: Option<NaiveDate>,
}

/// A single amount owed to one payee
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentItem {
    pub id: String,
    #[serde(default)]
    pub batch_id: String,
    pub payee_id: String,
    pub payee_name: String,
    /// Amount in cents, must be greater than zero
    pub amount: i64,
    /// Free-text reference to the source invoices
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub bank: PayeeBankProfile,
}

/// Payee bank details as resolved at snapshot time
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PayeeBankProfile {
    /// BSB in "DDD-DDD" form
    #[serde(default)]
    pub routing_code: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl PayeeBankProfile {
    pub fn new(routing_code: &str, account_number: &str, account_name: &str) -> Self {
        Self {
            routing_code: Some(routing_code.to_string()),
            account_number: Some(account_number.to_string()),
            account_name: Some(account_name.to_string()),
        }
    }

    /// True when routing code, account number and account name are all non-blank
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !present(&self.routing_code) {
            missing.push("routing_code");
        }
        if !present(&self.account_number) {
            missing.push("account_number");
        }
        if !present(&self.account_name) {
            missing.push("account_name");
        }
        missing
    }
}
