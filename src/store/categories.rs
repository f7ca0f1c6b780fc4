//! Category operations on the ledger store
//!
//! Renames and deletes never touch transactions or budgets; they keep the
//! old name.

use tracing::info;

use super::LedgerStore;
use crate::error::{LedgerResult, ValidationError};
use crate::models::category::normalize_category_name;
use crate::models::EntryKind;

impl LedgerStore {
    pub fn categories(&self, kind: EntryKind) -> &[String] {
        self.snapshot.categories(kind)
    }

    pub fn has_category(&self, kind: EntryKind, name: &str) -> bool {
        self.categories(kind).iter().any(|c| c == name)
    }

    pub async fn create_category(&mut self, kind: EntryKind, name: &str) -> LedgerResult<String> {
        let name = normalize_category_name(name)?;
        if self.has_category(kind, &name) {
            return Err(ValidationError::duplicate("Category", name).into());
        }

        let mut categories = self.categories(kind).to_vec();
        categories.push(name.clone());
        self.commit_categories(kind, categories).await?;

        info!(kind = %kind, category = %name, "created category");
        Ok(name)
    }

    /// Rename in place, keeping the category's position
    pub async fn rename_category(
        &mut self,
        kind: EntryKind,
        old_name: &str,
        new_name: &str,
    ) -> LedgerResult<String> {
        let new_name = normalize_category_name(new_name)?;
        let position = self
            .categories(kind)
            .iter()
            .position(|c| c == old_name)
            .ok_or_else(|| ValidationError::category_not_found(old_name))?;

        if new_name == old_name {
            return Ok(new_name);
        }
        if self.has_category(kind, &new_name) {
            return Err(ValidationError::duplicate("Category", new_name).into());
        }

        let mut categories = self.categories(kind).to_vec();
        categories[position] = new_name.clone();
        self.commit_categories(kind, categories).await?;

        info!(kind = %kind, from = old_name, to = %new_name, "renamed category");
        Ok(new_name)
    }

    /// Remove a category; missing names are ignored
    pub async fn delete_category(&mut self, kind: EntryKind, name: &str) -> LedgerResult<()> {
        if !self.has_category(kind, name) {
            return Ok(());
        }

        let categories = self
            .categories(kind)
            .iter()
            .filter(|c| *c != name)
            .cloned()
            .collect();
        self.commit_categories(kind, categories).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::config::Settings;
    use crate::models::{EntryKind, TransactionDraft};
    use crate::store::LedgerStore;

    async fn store() -> LedgerStore {
        LedgerStore::in_memory(&Settings::unseeded()).await.unwrap()
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let mut store = store().await;

        store.create_category(EntryKind::Income, "Other").await.unwrap();
        store.create_category(EntryKind::Expense, "Other").await.unwrap();

        let err = store
            .create_category(EntryKind::Expense, " Other ")
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.categories(EntryKind::Expense), ["Other"]);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let mut store = store().await;
        let err = store.create_category(EntryKind::Income, "  ").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rename_does_not_cascade() {
        let mut store = store().await;
        store.create_category(EntryKind::Expense, "Food").await.unwrap();
        store.create_category(EntryKind::Expense, "Rent").await.unwrap();
        let txn = store
            .create_transaction(
                EntryKind::Expense,
                TransactionDraft::new("Lunch", -10.0, Utc::now(), "Cash", "Food"),
            )
            .await
            .unwrap();

        store
            .rename_category(EntryKind::Expense, "Food", "Groceries")
            .await
            .unwrap();

        assert_eq!(store.categories(EntryKind::Expense), ["Groceries", "Rent"]);
        assert_eq!(store.transaction(&txn.id).unwrap().1.category, "Food");
    }

    #[tokio::test]
    async fn test_rename_errors() {
        let mut store = store().await;
        store.create_category(EntryKind::Expense, "Food").await.unwrap();
        store.create_category(EntryKind::Expense, "Rent").await.unwrap();

        let err = store
            .rename_category(EntryKind::Expense, "Missing", "X")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = store
            .rename_category(EntryKind::Expense, "Food", "Rent")
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_delete_category() {
        let mut store = store().await;
        store.create_category(EntryKind::Income, "Salary").await.unwrap();

        store.delete_category(EntryKind::Income, "Missing").await.unwrap();
        assert_eq!(store.revision(), 1);

        store.delete_category(EntryKind::Income, "Salary").await.unwrap();
        assert!(store.categories(EntryKind::Income).is_empty());
    }
}
