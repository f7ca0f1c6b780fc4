//! Dashboard and report formatting

use tabled::Tabled;

use super::transaction::format_activity;
use super::{table, truncate};
use crate::aggregate::{AccountReport, CategoryBreakdown, Dashboard, ReportKind};

/// Format a percentage with one decimal place
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    total: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn format_breakdown(breakdown: &CategoryBreakdown) -> String {
    let overall = breakdown.total().to_f64();
    let rows = breakdown
        .entries()
        .iter()
        .map(|entry| BreakdownRow {
            category: entry.category.clone(),
            total: entry.total.to_string(),
            count: entry.count,
            share: if overall > 0.0 {
                format_percentage(entry.total.to_f64() / overall * 100.0)
            } else {
                format_percentage(0.0)
            },
        })
        .collect();
    table(rows, "No spending recorded.")
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&format!("Total balance: {}\n\n", dashboard.total_balance));
    output.push_str("Recent activity\n");
    output.push_str(&format_activity(&dashboard.recent_activity));
    output.push_str("\nSpending by category\n");
    output.push_str(&format_breakdown(&dashboard.category_breakdown));
    output
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn format_account_report(report: &AccountReport) -> String {
    let mut output = format!("Report: {}\n", report.account_name);

    for kind in &report.kinds {
        output.push_str(&format!("\n{}\n", kind));
        match kind {
            ReportKind::IncomeVsExpenses => {
                let totals = &report.income_vs_expenses;
                output.push_str(&format!("  Income:   {:>12}\n", totals.total_income.to_string()));
                output.push_str(&format!("  Expenses: {:>12}\n", totals.total_expenses.to_string()));
                output.push_str(&format!("  Net:      {:>12}\n", totals.net.to_string()));
            }
            ReportKind::SpendingByCategory => {
                output.push_str(&format_breakdown(&report.spending_by_category));
            }
            ReportKind::LargestExpenses => {
                let rows = report
                    .largest_expenses
                    .iter()
                    .map(|t| ExpenseRow {
                        date: t.date.format("%Y-%m-%d").to_string(),
                        description: truncate(&t.description, 32),
                        category: t.category.clone(),
                        amount: t.amount.to_string(),
                    })
                    .collect();
                output.push_str(&table(rows, "No expenses."));
            }
        }
    }

    output
}
