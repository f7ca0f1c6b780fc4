//! CSV export
//!
//! Spreadsheet-friendly dumps of accounts, transactions and account reports.

use std::io::Write;

use crate::aggregate::{AccountReport, ReportKind};
use crate::error::LedgerResult;
use crate::models::{Account, EntryKind, Transaction};

/// One row per account
pub fn export_accounts_csv<W: Write>(accounts: &[Account], writer: W) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["ID", "Name", "Balance", "Currency", "Include In Total"])?;

    for account in accounts {
        wtr.write_record([
            account.id.to_string(),
            account.name.clone(),
            account.balance.to_string(),
            account.currency.clone(),
            account.include_in_total.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per transaction, tagged with its partition
pub fn export_transactions_csv<'a, W, I>(transactions: I, writer: W) -> LedgerResult<()>
where
    W: Write,
    I: IntoIterator<Item = (EntryKind, &'a Transaction)>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "ID",
        "Kind",
        "Date",
        "Description",
        "Account",
        "Category",
        "Amount",
        "Attachment Bytes",
    ])?;

    for (kind, txn) in transactions {
        wtr.write_record([
            txn.id.to_string(),
            kind.to_string(),
            txn.date.to_rfc3339(),
            txn.description.clone(),
            txn.account.clone(),
            txn.category.clone(),
            txn.amount.to_string(),
            txn.attachment.as_ref().map_or(0, |a| a.len()).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Report sections as `Account,Section,Label,Amount` rows
///
/// Only the sections each report computed are written.
pub fn export_reports_csv<W: Write>(reports: &[AccountReport], writer: W) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Account", "Section", "Label", "Amount"])?;

    for report in reports {
        let mut row = |kind: ReportKind, label: &str, amount: String| {
            wtr.write_record([
                report.account_name.as_str(),
                kind.to_string().as_str(),
                label,
                amount.as_str(),
            ])
        };

        if report.includes(ReportKind::IncomeVsExpenses) {
            let totals = &report.income_vs_expenses;
            row(ReportKind::IncomeVsExpenses, "Total Income", totals.total_income.to_string())?;
            row(ReportKind::IncomeVsExpenses, "Total Expenses", totals.total_expenses.to_string())?;
            row(ReportKind::IncomeVsExpenses, "Net", totals.net.to_string())?;
        }
        if report.includes(ReportKind::SpendingByCategory) {
            for entry in report.spending_by_category.entries() {
                row(ReportKind::SpendingByCategory, &entry.category, entry.total.to_string())?;
            }
        }
        if report.includes(ReportKind::LargestExpenses) {
            for txn in &report.largest_expenses {
                row(ReportKind::LargestExpenses, &txn.description, txn.amount.to_string())?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
