//! Per-account reports
//!
//! A report covers one account, matched by name against each transaction's
//! account field. Sections that were not requested are still present,
//! holding zero or empty values, so every report has the same shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::breakdown::{spending_by_category, CategoryBreakdown};
use crate::models::{Account, AccountId, Money, Transaction};

/// How many expenses the largest-expenses section keeps by default
pub const DEFAULT_LARGEST_EXPENSES: usize = 5;

/// The sections a report can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    IncomeVsExpenses,
    SpendingByCategory,
    LargestExpenses,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::IncomeVsExpenses,
        ReportKind::SpendingByCategory,
        ReportKind::LargestExpenses,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "incomevsexpenses" | "income" => Some(Self::IncomeVsExpenses),
            "spendingbycategory" | "spending" | "categories" => Some(Self::SpendingByCategory),
            "largestexpenses" | "largest" => Some(Self::LargestExpenses),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncomeVsExpenses => write!(f, "Income vs Expenses"),
            Self::SpendingByCategory => write!(f, "Spending by Category"),
            Self::LargestExpenses => write!(f, "Largest Expenses"),
        }
    }
}

/// Signed totals: expenses keep their stored sign, so `net = income + expenses`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeVsExpenses {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net: Money,
}

impl IncomeVsExpenses {
    pub fn from_transactions<'a>(
        income: impl IntoIterator<Item = &'a Transaction>,
        expense: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        let total_income: Money = income.into_iter().map(|t| t.amount).sum();
        let total_expenses: Money = expense.into_iter().map(|t| t.amount).sum();
        Self {
            total_income,
            total_expenses,
            net: total_income + total_expenses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    pub account_id: AccountId,
    pub account_name: String,
    /// Sections actually computed
    pub kinds: Vec<ReportKind>,
    pub income_vs_expenses: IncomeVsExpenses,
    pub spending_by_category: CategoryBreakdown,
    pub largest_expenses: Vec<Transaction>,
}

impl AccountReport {
    pub fn includes(&self, kind: ReportKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Report for one account; `kinds = None` computes every section
pub fn account_report(
    account: &Account,
    income: &[Transaction],
    expense: &[Transaction],
    kinds: Option<&[ReportKind]>,
    largest_limit: usize,
) -> AccountReport {
    let kinds: Vec<ReportKind> = match kinds {
        Some(requested) => ReportKind::ALL
            .into_iter()
            .filter(|k| requested.contains(k))
            .collect(),
        None => ReportKind::ALL.to_vec(),
    };

    let account_income: Vec<&Transaction> =
        income.iter().filter(|t| t.is_for_account(&account.name)).collect();
    let account_expense: Vec<Transaction> = expense
        .iter()
        .filter(|t| t.is_for_account(&account.name))
        .cloned()
        .collect();

    let mut report = AccountReport {
        account_id: account.id.clone(),
        account_name: account.name.clone(),
        kinds: kinds.clone(),
        income_vs_expenses: IncomeVsExpenses::default(),
        spending_by_category: CategoryBreakdown::default(),
        largest_expenses: Vec::new(),
    };

    for kind in kinds {
        match kind {
            ReportKind::IncomeVsExpenses => {
                report.income_vs_expenses = IncomeVsExpenses::from_transactions(
                    account_income.iter().copied(),
                    account_expense.iter(),
                );
            }
            ReportKind::SpendingByCategory => {
                report.spending_by_category = spending_by_category(&account_expense);
            }
            ReportKind::LargestExpenses => {
                report.largest_expenses = largest_expenses(&account_expense, largest_limit);
            }
        }
    }

    report
}

/// Reports for every account, in account order
pub fn account_reports(
    accounts: &[Account],
    income: &[Transaction],
    expense: &[Transaction],
    kinds: Option<&[ReportKind]>,
    largest_limit: usize,
) -> Vec<AccountReport> {
    accounts
        .iter()
        .map(|a| account_report(a, income, expense, kinds, largest_limit))
        .collect()
}

/// Largest by absolute amount; the stable sort keeps ties in input order
fn largest_expenses(expense: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = expense.to_vec();
    sorted.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
    sorted.truncate(limit);
    sorted
}
