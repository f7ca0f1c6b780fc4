//! Transaction display formatting

use tabled::Tabled;

use super::{table, truncate};
use crate::aggregate::ActivityItem;
use crate::models::{EntryKind, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: EntryKind,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl TransactionRow {
    fn new(kind: EntryKind, txn: &Transaction) -> Self {
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind,
            description: truncate(&txn.description, 32),
            account: txn.account.clone(),
            category: txn.category.clone(),
            amount: txn.amount.to_string(),
            id: txn.id.to_string(),
        }
    }
}

pub fn format_transaction_list(transactions: &[(EntryKind, &Transaction)]) -> String {
    let rows = transactions
        .iter()
        .map(|(kind, txn)| TransactionRow::new(*kind, txn))
        .collect();
    table(rows, "No transactions found.")
}

/// The recent-activity feed
pub fn format_activity(items: &[ActivityItem]) -> String {
    let rows = items
        .iter()
        .map(|item| TransactionRow::new(item.kind, &item.transaction))
        .collect();
    table(rows, "No recent activity.")
}

pub fn format_transaction_details(kind: EntryKind, txn: &Transaction) -> String {
    let attachment = match &txn.attachment {
        Some(a) => format!("{} bytes", a.len()),
        None => "none".to_string(),
    };
    format!(
        "{} transaction {}\n  Date:        {}\n  Description: {}\n  Amount:      {}\n  Account:     {}\n  Category:    {}\n  Attachment:  {}\n",
        kind,
        txn.id,
        txn.date.to_rfc3339(),
        txn.description,
        txn.amount,
        txn.account,
        txn.category,
        attachment,
    )
}
