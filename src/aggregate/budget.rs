//! Budget progress

use serde::Serialize;

use crate::models::{Budget, BudgetId, EntryKind, Money};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub id: BudgetId,
    pub kind: EntryKind,
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    pub remaining: Money,
    /// Share of the limit used, in percent
    pub percent_used: f64,
}

impl BudgetProgress {
    pub fn of(kind: EntryKind, budget: &Budget) -> Self {
        let percent_used = if budget.limit.is_zero() {
            // A zero limit is either untouched or fully used
            if budget.spent.is_positive() {
                100.0
            } else {
                0.0
            }
        } else {
            budget.spent.to_f64() / budget.limit.to_f64() * 100.0
        };

        Self {
            id: budget.id.clone(),
            kind,
            category: budget.category.clone(),
            limit: budget.limit,
            spent: budget.spent,
            remaining: budget.remaining(),
            percent_used,
        }
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

/// Progress for each budget in order
pub fn budget_progress(kind: EntryKind, budgets: &[Budget]) -> Vec<BudgetProgress> {
    budgets.iter().map(|b| BudgetProgress::of(kind, b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_remaining() {
        let mut budget = Budget::new("Food", Money::from_units(200));
        budget.spent = Money::from_units(50);

        let progress = budget_progress(EntryKind::Expense, &[budget]);

        assert_eq!(progress[0].percent_used, 25.0);
        assert_eq!(progress[0].remaining, Money::from_units(150));
        assert!(!progress[0].is_over());
    }

    #[test]
    fn test_overspent() {
        let mut budget = Budget::new("Food", Money::from_units(100));
        budget.spent = Money::from_units(150);

        let progress = BudgetProgress::of(EntryKind::Expense, &budget);
        assert!(progress.is_over());
        assert_eq!(progress.percent_used, 150.0);
    }

    #[test]
    fn test_zero_limit() {
        let budget = Budget::new("Gifts", Money::zero());
        assert_eq!(BudgetProgress::of(EntryKind::Expense, &budget).percent_used, 0.0);
    }
}
