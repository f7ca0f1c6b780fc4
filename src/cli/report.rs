//! Report and dashboard CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;

use crate::aggregate::{account_report, account_reports, AccountReport, Dashboard, ReportKind};
use crate::config::Settings;
use crate::display::{format_account_report, format_dashboard};
use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::export::export_reports_csv;
use crate::models::EntryKind;
use crate::store::LedgerStore;

fn parse_report_kind(s: &str) -> Result<ReportKind, String> {
    ReportKind::parse(s).ok_or_else(|| {
        format!(
            "'{}' is not a report (use income-vs-expenses, spending-by-category or largest-expenses)",
            s
        )
    })
}

/// Per-account report options
#[derive(Args)]
pub struct ReportArgs {
    /// Only this account (name or ID); defaults to every account
    #[arg(short, long)]
    pub account: Option<String>,
    /// Sections to compute (repeatable); defaults to all
    #[arg(short, long = "section", value_parser = parse_report_kind)]
    pub sections: Vec<ReportKind>,
    /// How many largest expenses to list
    #[arg(short, long)]
    pub limit: Option<usize>,
    /// Also write the reports to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Handle the report command
pub fn handle_report_command(
    store: &LedgerStore,
    settings: &Settings,
    args: ReportArgs,
) -> LedgerResult<()> {
    let kinds = (!args.sections.is_empty()).then_some(args.sections.as_slice());
    let limit = args.limit.unwrap_or(settings.largest_expenses_limit);
    let income = store.transactions(EntryKind::Income);
    let expense = store.transactions(EntryKind::Expense);

    let reports: Vec<AccountReport> = match &args.account {
        Some(identifier) => {
            let account = store
                .find_account(identifier)
                .ok_or_else(|| ValidationError::account_not_found(identifier))?;
            vec![account_report(account, income, expense, kinds, limit)]
        }
        None => account_reports(store.accounts(), income, expense, kinds, limit),
    };

    if reports.is_empty() {
        println!("No accounts to report on.");
        return Ok(());
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_account_report(report));
    }

    if let Some(path) = args.csv {
        let file = File::create(&path).map_err(|e| {
            LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        export_reports_csv(&reports, BufWriter::new(file))?;
        println!("\nWrote {} report(s) to {}", reports.len(), path.display());
    }

    Ok(())
}

/// Handle the dashboard command
pub fn handle_dashboard_command(
    store: &LedgerStore,
    settings: &Settings,
    limit: Option<usize>,
    json: bool,
) -> LedgerResult<()> {
    let dashboard = Dashboard::compute(
        store.snapshot(),
        limit.unwrap_or(settings.recent_activity_limit),
    );

    if json {
        let out = serde_json::to_string_pretty(&dashboard)
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        println!("{}", out);
    } else {
        print!("{}", format_dashboard(&dashboard));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_kind() {
        assert_eq!(
            parse_report_kind("largest-expenses"),
            Ok(ReportKind::LargestExpenses)
        );
        assert!(parse_report_kind("pie-chart").is_err());
    }
}
