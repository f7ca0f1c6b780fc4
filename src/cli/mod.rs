//! CLI command handlers
//!
//! Bridges clap argument parsing with the entity store, the aggregation
//! engine and the snapshot service.

pub mod account;
pub mod backup;
pub mod budget;
pub mod category;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use report::{handle_dashboard_command, handle_report_command, ReportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryKind, Money};

/// clap value parser for `income` / `expense`
pub fn parse_kind(s: &str) -> Result<EntryKind, String> {
    EntryKind::parse(s).ok_or_else(|| format!("'{}' is not a kind (use income or expense)", s))
}

/// Parse a user-entered amount such as `12.50`, `-$1,250` or `10`
pub fn parse_amount(s: &str) -> LedgerResult<f64> {
    Money::parse(s)
        .map(|m| m.to_f64())
        .map_err(|e| LedgerError::InvalidInput(format!("amount '{}': {}", s, e)))
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_date(s: &str) -> LedgerResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| {
            LedgerError::InvalidInput(format!(
                "date '{}': use YYYY-MM-DD or an RFC 3339 timestamp",
                s
            ))
        })
}
