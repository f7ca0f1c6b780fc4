//! Transaction filtering by account and category, with totals

use serde::Serialize;

use super::report::IncomeVsExpenses;
use crate::models::Transaction;

/// Account names and a category to narrow a transaction list
///
/// An empty account list and a missing category both match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub accounts: Vec<String>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, name: impl Into<String>) -> Self {
        self.accounts.push(name.into());
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        let account_ok = self.accounts.is_empty() || self.accounts.iter().any(|a| txn.is_for_account(a));
        let category_ok = self.category.as_deref().map_or(true, |c| txn.category == c);
        account_ok && category_ok
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }

    pub fn totals(&self, income: &[Transaction], expense: &[Transaction]) -> FilteredTotals {
        let income = self.apply(income);
        let expense = self.apply(expense);
        FilteredTotals {
            income_count: income.len(),
            expense_count: expense.len(),
            totals: IncomeVsExpenses::from_transactions(income, expense),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredTotals {
    pub income_count: usize,
    pub expense_count: usize,
    #[serde(flatten)]
    pub totals: IncomeVsExpenses,
}
