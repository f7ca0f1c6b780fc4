//! Key names under which each collection is persisted

use crate::models::EntryKind;

pub const ACCOUNTS: &str = "accounts";
pub const INCOME_TRANSACTIONS: &str = "incomeTransactions";
pub const EXPENSE_TRANSACTIONS: &str = "expenseTransactions";
pub const INCOME_CATEGORIES: &str = "incomeCategories";
pub const EXPENSE_CATEGORIES: &str = "expenseCategories";
pub const INCOME_BUDGETS: &str = "incomeBudgets";
pub const EXPENSE_BUDGETS: &str = "expenseBudgets";

pub fn transactions(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Income => INCOME_TRANSACTIONS,
        EntryKind::Expense => EXPENSE_TRANSACTIONS,
    }
}

pub fn categories(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Income => INCOME_CATEGORIES,
        EntryKind::Expense => EXPENSE_CATEGORIES,
    }
}

pub fn budgets(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Income => INCOME_BUDGETS,
        EntryKind::Expense => EXPENSE_BUDGETS,
    }
}
