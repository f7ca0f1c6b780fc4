//! Display formatting for terminal output
//!
//! Turns ledger entities and derived views into tables for the command line.

pub mod account;
pub mod budget;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget_list, format_category_list};
pub use report::{format_account_report, format_dashboard, format_percentage};
pub use transaction::{format_activity, format_transaction_details, format_transaction_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("{}\n", empty);
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
