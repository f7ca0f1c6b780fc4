//! Entity store
//!
//! Typed collections layered on the durable key-value layer. The store holds
//! the last-loaded snapshot in memory and serves synchronous reads from it.
//! Every mutation validates first, persists the whole affected collection,
//! and only then swaps the new collection in and bumps the revision.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod keys;
pub mod transactions;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{LedgerResult, StoreError, ValidationError};
use crate::kv::DurableKv;
use crate::models::{Account, Budget, EntryKind, Money, Transaction};

/// Every collection the store owns, as plain values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub income_transactions: Vec<Transaction>,
    pub expense_transactions: Vec<Transaction>,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub income_budgets: Vec<Budget>,
    pub expense_budgets: Vec<Budget>,
}

impl LedgerSnapshot {
    pub fn transactions(&self, kind: EntryKind) -> &Vec<Transaction> {
        match kind {
            EntryKind::Income => &self.income_transactions,
            EntryKind::Expense => &self.expense_transactions,
        }
    }

    pub fn categories(&self, kind: EntryKind) -> &Vec<String> {
        match kind {
            EntryKind::Income => &self.income_categories,
            EntryKind::Expense => &self.expense_categories,
        }
    }

    pub fn budgets(&self, kind: EntryKind) -> &Vec<Budget> {
        match kind {
            EntryKind::Income => &self.income_budgets,
            EntryKind::Expense => &self.expense_budgets,
        }
    }

    fn transactions_mut(&mut self, kind: EntryKind) -> &mut Vec<Transaction> {
        match kind {
            EntryKind::Income => &mut self.income_transactions,
            EntryKind::Expense => &mut self.expense_transactions,
        }
    }

    fn categories_mut(&mut self, kind: EntryKind) -> &mut Vec<String> {
        match kind {
            EntryKind::Income => &mut self.income_categories,
            EntryKind::Expense => &mut self.expense_categories,
        }
    }

    fn budgets_mut(&mut self, kind: EntryKind) -> &mut Vec<Budget> {
        match kind {
            EntryKind::Income => &mut self.income_budgets,
            EntryKind::Expense => &mut self.expense_budgets,
        }
    }

    /// Serialize every collection under its store key
    pub(crate) fn encode_all(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(vec![
            encode_entry(keys::ACCOUNTS, &self.accounts)?,
            encode_entry(keys::INCOME_TRANSACTIONS, &self.income_transactions)?,
            encode_entry(keys::EXPENSE_TRANSACTIONS, &self.expense_transactions)?,
            encode_entry(keys::INCOME_CATEGORIES, &self.income_categories)?,
            encode_entry(keys::EXPENSE_CATEGORIES, &self.expense_categories)?,
            encode_entry(keys::INCOME_BUDGETS, &self.income_budgets)?,
            encode_entry(keys::EXPENSE_BUDGETS, &self.expense_budgets)?,
        ])
    }
}

/// The canonical owner of ledger entities
pub struct LedgerStore {
    kv: DurableKv,
    snapshot: LedgerSnapshot,
    revision: u64,
}

impl LedgerStore {
    /// Load every collection, seeding default categories when none are stored
    pub async fn open(kv: DurableKv, settings: &Settings) -> LedgerResult<Self> {
        let mut snapshot = LedgerSnapshot {
            accounts: load(&kv, keys::ACCOUNTS).await?.unwrap_or_default(),
            income_transactions: load(&kv, keys::INCOME_TRANSACTIONS)
                .await?
                .unwrap_or_default(),
            expense_transactions: load(&kv, keys::EXPENSE_TRANSACTIONS)
                .await?
                .unwrap_or_default(),
            income_budgets: load(&kv, keys::INCOME_BUDGETS).await?.unwrap_or_default(),
            expense_budgets: load(&kv, keys::EXPENSE_BUDGETS).await?.unwrap_or_default(),
            ..LedgerSnapshot::default()
        };

        for kind in EntryKind::ALL {
            let key = keys::categories(kind);
            let categories = match load::<Vec<String>>(&kv, key).await? {
                Some(stored) => stored,
                None => {
                    let seeded = match kind {
                        EntryKind::Income => settings.default_income_categories.clone(),
                        EntryKind::Expense => settings.default_expense_categories.clone(),
                    };
                    if !seeded.is_empty() {
                        kv.put(key, encode(key, &seeded)?).await?;
                        info!(kind = %kind, count = seeded.len(), "seeded default categories");
                    }
                    seeded
                }
            };
            *snapshot.categories_mut(kind) = categories;
        }

        debug!(
            accounts = snapshot.accounts.len(),
            income = snapshot.income_transactions.len(),
            expenses = snapshot.expense_transactions.len(),
            "loaded ledger"
        );

        Ok(Self {
            kv,
            snapshot,
            revision: 0,
        })
    }

    /// A store over a fresh in-memory key-value layer
    pub async fn in_memory(settings: &Settings) -> LedgerResult<Self> {
        Self::open(DurableKv::in_memory(), settings).await
    }

    /// The current in-memory state
    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    /// Incremented after every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn kv(&self) -> &DurableKv {
        &self.kv
    }

    /// Overwrite every collection in one batch; nothing changes on failure
    pub async fn replace_all(&mut self, snapshot: LedgerSnapshot) -> LedgerResult<()> {
        self.kv.put_batch(snapshot.encode_all()?).await?;
        self.snapshot = snapshot;
        self.bump();
        Ok(())
    }

    async fn persist<T: Serialize>(&self, key: &str, value: &T) -> LedgerResult<()> {
        self.kv.put(key, encode(key, value)?).await?;
        Ok(())
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub(crate) async fn commit_accounts(&mut self, accounts: Vec<Account>) -> LedgerResult<()> {
        self.persist(keys::ACCOUNTS, &accounts).await?;
        self.snapshot.accounts = accounts;
        self.bump();
        Ok(())
    }

    pub(crate) async fn commit_transactions(
        &mut self,
        kind: EntryKind,
        transactions: Vec<Transaction>,
    ) -> LedgerResult<()> {
        self.persist(keys::transactions(kind), &transactions).await?;
        *self.snapshot.transactions_mut(kind) = transactions;
        self.bump();
        Ok(())
    }

    pub(crate) async fn commit_categories(
        &mut self,
        kind: EntryKind,
        categories: Vec<String>,
    ) -> LedgerResult<()> {
        self.persist(keys::categories(kind), &categories).await?;
        *self.snapshot.categories_mut(kind) = categories;
        self.bump();
        Ok(())
    }

    pub(crate) async fn commit_budgets(
        &mut self,
        kind: EntryKind,
        budgets: Vec<Budget>,
    ) -> LedgerResult<()> {
        self.persist(keys::budgets(kind), &budgets).await?;
        *self.snapshot.budgets_mut(kind) = budgets;
        self.bump();
        Ok(())
    }
}

/// Convert a collaborator-supplied float into money
pub(crate) fn to_money(field: &'static str, value: f64) -> Result<Money, ValidationError> {
    Money::from_f64(value)
        .ok_or_else(|| ValidationError::invalid_amount(field, "must be a finite number"))?
        .ensure_within_limit(field)
}

/// Trim a required text field
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::RequiredField(field));
    }
    Ok(value.to_string())
}

async fn load<T: DeserializeOwned>(kv: &DurableKv, key: &str) -> Result<Option<T>, StoreError> {
    match kv.get(key).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|e| StoreError::write_failed(key, e.to_string()))
}

fn encode_entry<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
) -> Result<(String, Vec<u8>), StoreError> {
    Ok((key.to_string(), encode(key, value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::error::LedgerError;
    use crate::kv::{MemoryBackend, StorageHandle};
    use crate::models::{TransactionDraft, TransactionPatch};
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_seeds_default_categories() {
        let store = LedgerStore::in_memory(&Settings::default()).await.unwrap();

        assert_eq!(store.categories(EntryKind::Income), ["Salary", "Investments"]);
        assert_eq!(
            store.categories(EntryKind::Expense),
            ["Food", "Rent", "Transportation"]
        );
        assert!(store.accounts().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_stored_empty_categories_are_not_reseeded() {
        let primary = Arc::new(MemoryBackend::new());
        let kv = DurableKv::new(
            StorageHandle::with_backend(primary.clone()),
            Arc::new(MemoryBackend::new()),
        );
        kv.put(keys::INCOME_CATEGORIES, b"[]".to_vec()).await.unwrap();

        let store = LedgerStore::open(kv, &Settings::default()).await.unwrap();
        assert!(store.categories(EntryKind::Income).is_empty());
        assert_eq!(store.categories(EntryKind::Expense).len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_reported() {
        let kv = DurableKv::in_memory();
        kv.put(keys::ACCOUNTS, b"{not json".to_vec()).await.unwrap();

        let err = LedgerStore::open(kv, &Settings::unseeded())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("accounts"));
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let mut store = LedgerStore::open(DurableKv::open(&paths), &Settings::default())
            .await
            .unwrap();
        store.create_account("Checking", 100.0, "USD").await.unwrap();
        store.create_category(EntryKind::Expense, "Travel").await.unwrap();
        drop(store);

        let reopened = LedgerStore::open(DurableKv::open(&paths), &Settings::default())
            .await
            .unwrap();
        assert_eq!(reopened.accounts().len(), 1);
        assert!(reopened
            .categories(EntryKind::Expense)
            .contains(&"Travel".to_string()));
    }

    #[tokio::test]
    async fn test_replace_all_swaps_every_collection() {
        let mut store = LedgerStore::in_memory(&Settings::default()).await.unwrap();
        let replacement = LedgerSnapshot {
            income_categories: vec!["Bonus".into()],
            ..LedgerSnapshot::default()
        };

        store.replace_all(replacement.clone()).await.unwrap();

        assert_eq!(store.snapshot(), &replacement);
        assert_eq!(store.revision(), 1);
    }

    fn failing_tiers() -> (Arc<MemoryBackend>, Arc<MemoryBackend>, DurableKv) {
        let primary = Arc::new(MemoryBackend::new());
        let fallback = Arc::new(MemoryBackend::new());
        let kv = DurableKv::new(
            StorageHandle::with_backend(primary.clone()),
            fallback.clone(),
        );
        (primary, fallback, kv)
    }

    fn assert_write_failed(err: LedgerError) {
        assert!(
            matches!(err, LedgerError::Store(StoreError::WriteFailed { .. })),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn test_failed_create_leaves_state_untouched() {
        let (primary, fallback, kv) = failing_tiers();
        let mut store = LedgerStore::open(kv, &Settings::unseeded()).await.unwrap();
        let before = store.snapshot().clone();

        primary.set_fail_writes(true);
        fallback.set_fail_writes(true);
        let err = store.create_account("Checking", 10.0, "USD").await.unwrap_err();

        assert_write_failed(err);
        assert_eq!(store.snapshot(), &before);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state_untouched() {
        let (primary, fallback, kv) = failing_tiers();
        let mut store = LedgerStore::open(kv, &Settings::unseeded()).await.unwrap();
        let transaction = store
            .create_transaction(
                EntryKind::Expense,
                TransactionDraft::new("Lunch", -12.0, Utc::now(), "Cash", "Food"),
            )
            .await
            .unwrap();
        let before = store.snapshot().clone();

        primary.set_fail_writes(true);
        fallback.set_fail_writes(true);
        let patch = TransactionPatch {
            amount: Some(-20.0),
            ..TransactionPatch::default()
        };
        let err = store
            .update_transaction(&transaction.id, patch)
            .await
            .unwrap_err();

        assert_write_failed(err);
        assert_eq!(store.snapshot(), &before);
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state_untouched() {
        let (primary, fallback, kv) = failing_tiers();
        let mut store = LedgerStore::open(kv, &Settings::unseeded()).await.unwrap();
        let budget = store
            .create_budget(EntryKind::Expense, "Food", 300.0)
            .await
            .unwrap();
        let before = store.snapshot().clone();

        primary.set_fail_writes(true);
        fallback.set_fail_writes(true);
        let err = store.delete_budget(&budget.id).await.unwrap_err();

        assert_write_failed(err);
        assert_eq!(store.snapshot(), &before);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.budgets(EntryKind::Expense).len(), 1);
    }

    #[test]
    fn test_to_money_rejects_non_finite() {
        assert!(to_money("amount", f64::NAN).is_err());
        assert!(to_money("amount", f64::INFINITY).is_err());
        assert_eq!(to_money("amount", 12.5).unwrap().to_string(), "12.50");
    }

    #[test]
    fn test_to_money_rejects_huge_values() {
        assert!(matches!(
            to_money("balance", 5e28),
            Err(ValidationError::InvalidAmount { field: "balance", .. })
        ));
        assert!(to_money("balance", -1e16).is_err());
        assert!(to_money("balance", 1e15).is_ok());
    }
}
