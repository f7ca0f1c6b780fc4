//! Transaction model
//!
//! A transaction lives in exactly one partition (income or expense), chosen
//! when it is created. The account and category are referenced by *name*;
//! they are soft references that nothing repairs when the target is renamed
//! or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::attachment::Attachment;
use super::ids::TransactionId;
use super::money::Money;
use crate::error::ValidationError;

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    pub description: String,

    /// Signed amount; income is positive and expenses negative by convention
    pub amount: Money,

    pub date: DateTime<Utc>,

    /// Name of the account this transaction was booked against
    pub account: String,

    /// Name of the category, within the transaction's partition
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Transaction {
    /// Validate the required text fields and the amount's range
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::RequiredField("Transaction description"));
        }
        if self.account.trim().is_empty() {
            return Err(ValidationError::RequiredField("Transaction account"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::RequiredField("Transaction category"));
        }
        self.amount.ensure_within_limit("amount")?;
        Ok(())
    }

    /// Whether this transaction belongs to the named account
    pub fn is_for_account(&self, account_name: &str) -> bool {
        self.account == account_name
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.description,
            self.amount,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub account: String,
    pub category: String,
    pub attachment: Option<Vec<u8>>,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: DateTime<Utc>,
        account: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            account: account.into(),
            category: category.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, bytes: Vec<u8>) -> Self {
        self.attachment = Some(bytes);
        self
    }
}

/// Partial update for a transaction; the partition cannot be changed
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub account: Option<String>,
    pub category: Option<String>,
    /// `Some(None)` removes the attachment
    pub attachment: Option<Option<Vec<u8>>>,
}

impl TransactionPatch {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn attachment(mut self, attachment: Option<Vec<u8>>) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId::from("t1"),
            description: "Groceries".into(),
            amount: Money::from_units(-120),
            date: Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
            account: "Checking Account".into(),
            category: "Food".into(),
            attachment: None,
        }
    }

    #[test]
    fn test_validation_requires_text_fields() {
        let mut txn = sample();
        assert!(txn.validate().is_ok());

        txn.category = String::new();
        assert_eq!(
            txn.validate(),
            Err(ValidationError::RequiredField("Transaction category"))
        );
    }

    #[test]
    fn test_reads_iso_timestamps() {
        let txn: Transaction = serde_json::from_str(
            r#"{"id":"x","description":"Salary","amount":5000,
                "date":"2024-05-01T09:30:00.000Z","account":"Checking Account",
                "category":"Salary"}"#,
        )
        .unwrap();
        assert_eq!(txn.date, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
        assert!(txn.attachment.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Groceries - -120.00 (2025-01-15)");
    }
}
