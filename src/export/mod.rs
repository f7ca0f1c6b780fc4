//! Export module
//!
//! Provides spreadsheet-compatible CSV exports. The full JSON export lives in
//! [`crate::snapshot`].

pub mod csv;

pub use self::csv::{export_accounts_csv, export_reports_csv, export_transactions_csv};
