//! Budget model
//!
//! A budget caps one category within one partition. `spent` is a counter the
//! collaborator maintains; it is never recomputed from transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use crate::error::ValidationError;

/// A spending (or earning) limit for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Category name this budget applies to
    pub category: String,

    /// Upper bound, never negative
    pub limit: Money,

    /// Amount recorded against the budget so far
    #[serde(default)]
    pub spent: Money,
}

impl Budget {
    /// Create a budget with nothing spent
    pub fn new(category: impl Into<String>, limit: Money) -> Self {
        Self {
            id: BudgetId::new(),
            category: category.into(),
            limit,
            spent: Money::zero(),
        }
    }

    /// Amount left before the limit is reached (negative when over)
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::RequiredField("Budget category"));
        }
        if self.limit.is_negative() {
            return Err(ValidationError::invalid_amount(
                "budget limit",
                "must not be negative",
            ));
        }
        self.limit.ensure_within_limit("budget limit")?;
        self.spent.ensure_within_limit("budget spent")?;
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} / {}", self.category, self.spent, self.limit)
    }
}

/// Partial update for a budget
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub limit: Option<f64>,
    pub spent: Option<f64>,
}

impl BudgetPatch {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn spent(mut self, spent: f64) -> Self {
        self.spent = Some(spent);
        self
    }
}
