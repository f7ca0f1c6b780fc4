//! Spending grouped by category

use serde::Serialize;

use crate::models::{Money, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Absolute amount spent
    pub total: Money,
    pub count: usize,
}

/// Category totals in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryBreakdown(Vec<CategoryTotal>);

impl CategoryBreakdown {
    pub fn entries(&self) -> &[CategoryTotal] {
        &self.0
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.0
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.total)
    }

    pub fn total(&self) -> Money {
        self.0.iter().map(|e| e.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Group outflows (amount < 0) by category, summing absolute values
///
/// Transactions without a category or with a non-negative amount are
/// skipped, and categories with nothing to report are left out.
pub fn category_breakdown(expense: &[Transaction]) -> CategoryBreakdown {
    group_by_category(expense, |t| t.amount.is_negative())
}

/// Group every categorized entry by category, summing absolute values
///
/// Unlike [`category_breakdown`], entries of either sign count. Account
/// reports use this so their sections agree on which entries are expenses.
pub fn spending_by_category(expense: &[Transaction]) -> CategoryBreakdown {
    group_by_category(expense, |_| true)
}

fn group_by_category(
    transactions: &[Transaction],
    include: impl Fn(&Transaction) -> bool,
) -> CategoryBreakdown {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for txn in transactions {
        if txn.category.is_empty() || !include(txn) {
            continue;
        }
        match totals.iter_mut().find(|e| e.category == txn.category) {
            Some(entry) => {
                entry.total += txn.amount.abs();
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: txn.category.clone(),
                total: txn.amount.abs(),
                count: 1,
            }),
        }
    }

    CategoryBreakdown(totals)
}
