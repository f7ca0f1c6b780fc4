//! Budget operations on the ledger store
//!
//! One budget per category per partition. `spent` only changes through
//! [`LedgerStore::record_budget_spending`] or an explicit patch.

use tracing::info;

use super::{to_money, LedgerStore};
use crate::error::{LedgerResult, ValidationError};
use crate::models::category::normalize_category_name;
use crate::models::{Budget, BudgetId, BudgetPatch, EntryKind};

impl LedgerStore {
    pub fn budgets(&self, kind: EntryKind) -> &[Budget] {
        self.snapshot.budgets(kind)
    }

    pub fn budget(&self, id: &BudgetId) -> Option<(EntryKind, &Budget)> {
        EntryKind::ALL.into_iter().find_map(|kind| {
            self.budgets(kind)
                .iter()
                .find(|b| &b.id == id)
                .map(|b| (kind, b))
        })
    }

    fn budget_category_taken(
        &self,
        kind: EntryKind,
        category: &str,
        except: Option<&BudgetId>,
    ) -> bool {
        self.budgets(kind)
            .iter()
            .any(|b| b.category == category && Some(&b.id) != except)
    }

    pub async fn create_budget(
        &mut self,
        kind: EntryKind,
        category: &str,
        limit: f64,
    ) -> LedgerResult<Budget> {
        let category = normalize_category_name(category)?;
        let limit = to_money("budget limit", limit)?;

        if self.budget_category_taken(kind, &category, None) {
            return Err(ValidationError::duplicate("Budget", category).into());
        }

        let budget = Budget::new(category, limit);
        budget.validate()?;

        let mut budgets = self.budgets(kind).to_vec();
        budgets.push(budget.clone());
        self.commit_budgets(kind, budgets).await?;

        info!(kind = %kind, category = %budget.category, "created budget");
        Ok(budget)
    }

    pub async fn update_budget(&mut self, id: &BudgetId, patch: BudgetPatch) -> LedgerResult<Budget> {
        let (kind, current) = self
            .budget(id)
            .ok_or_else(|| ValidationError::budget_not_found(id.as_str()))?;
        let mut budget = current.clone();

        if let Some(category) = patch.category {
            let category = normalize_category_name(&category)?;
            if self.budget_category_taken(kind, &category, Some(id)) {
                return Err(ValidationError::duplicate("Budget", category).into());
            }
            budget.category = category;
        }
        if let Some(limit) = patch.limit {
            budget.limit = to_money("budget limit", limit)?;
        }
        if let Some(spent) = patch.spent {
            budget.spent = to_money("budget spent", spent)?;
        }
        budget.validate()?;

        self.replace_budget(kind, budget.clone()).await?;
        Ok(budget)
    }

    /// Add `delta` to a budget's spent counter
    pub async fn record_budget_spending(&mut self, id: &BudgetId, delta: f64) -> LedgerResult<Budget> {
        let delta = to_money("budget spending", delta)?;
        let (kind, current) = self
            .budget(id)
            .ok_or_else(|| ValidationError::budget_not_found(id.as_str()))?;

        let mut budget = current.clone();
        budget.spent = budget
            .spent
            .checked_add(delta)
            .ok_or_else(|| ValidationError::invalid_amount("budget spent", "total is out of range"))?
            .ensure_within_limit("budget spent")?;

        self.replace_budget(kind, budget.clone()).await?;
        Ok(budget)
    }

    /// Remove a budget; unknown ids are ignored
    pub async fn delete_budget(&mut self, id: &BudgetId) -> LedgerResult<()> {
        let Some((kind, _)) = self.budget(id) else {
            return Ok(());
        };

        let budgets = self
            .budgets(kind)
            .iter()
            .filter(|b| &b.id != id)
            .cloned()
            .collect();
        self.commit_budgets(kind, budgets).await
    }

    async fn replace_budget(&mut self, kind: EntryKind, budget: Budget) -> LedgerResult<()> {
        let budgets = self
            .budgets(kind)
            .iter()
            .map(|b| {
                if b.id == budget.id {
                    budget.clone()
                } else {
                    b.clone()
                }
            })
            .collect();
        self.commit_budgets(kind, budgets).await
    }
}
