//! Account operations on the ledger store

use tracing::info;

use super::{required, to_money, LedgerStore};
use crate::error::{LedgerResult, ValidationError};
use crate::models::{Account, AccountId, AccountPatch};

impl LedgerStore {
    pub fn accounts(&self) -> &[Account] {
        &self.snapshot.accounts
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.snapshot.accounts.iter().find(|a| &a.id == id)
    }

    /// Exact name match
    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        self.snapshot.accounts.iter().find(|a| a.name == name)
    }

    /// Find an account by name or id
    pub fn find_account(&self, identifier: &str) -> Option<&Account> {
        self.account_by_name(identifier)
            .or_else(|| self.account(&AccountId::from(identifier)))
    }

    fn account_name_taken(&self, name: &str, except: Option<&AccountId>) -> bool {
        self.snapshot
            .accounts
            .iter()
            .any(|a| a.name == name && Some(&a.id) != except)
    }

    /// Create an account with a fresh id
    pub async fn create_account(
        &mut self,
        name: &str,
        balance: f64,
        currency: &str,
    ) -> LedgerResult<Account> {
        let name = required("Account name", name)?;
        let currency = required("Account currency", currency)?;
        let balance = to_money("balance", balance)?;

        if self.account_name_taken(&name, None) {
            return Err(ValidationError::duplicate("Account", name).into());
        }

        let account = Account::new(name, balance, currency);
        account.validate()?;

        let mut accounts = self.snapshot.accounts.clone();
        accounts.push(account.clone());
        self.commit_accounts(accounts).await?;

        info!(account = %account.name, "created account");
        Ok(account)
    }

    /// Apply a partial update
    pub async fn update_account(
        &mut self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> LedgerResult<Account> {
        let mut account = self
            .account(id)
            .cloned()
            .ok_or_else(|| ValidationError::account_not_found(id.as_str()))?;

        if let Some(name) = patch.name {
            let name = required("Account name", &name)?;
            if self.account_name_taken(&name, Some(id)) {
                return Err(ValidationError::duplicate("Account", name).into());
            }
            account.name = name;
        }
        if let Some(balance) = patch.balance {
            account.balance = to_money("balance", balance)?;
        }
        if let Some(currency) = patch.currency {
            account.currency = required("Account currency", &currency)?;
        }
        if let Some(include) = patch.include_in_total {
            account.include_in_total = include;
        }
        account.validate()?;

        let accounts = self
            .snapshot
            .accounts
            .iter()
            .map(|a| if &a.id == id { account.clone() } else { a.clone() })
            .collect();
        self.commit_accounts(accounts).await?;

        Ok(account)
    }

    pub async fn set_include_in_total(
        &mut self,
        id: &AccountId,
        include: bool,
    ) -> LedgerResult<Account> {
        self.update_account(id, AccountPatch::default().include_in_total(include))
            .await
    }

    /// Remove an account; transactions that name it are left alone
    ///
    /// Unknown ids are ignored.
    pub async fn delete_account(&mut self, id: &AccountId) -> LedgerResult<()> {
        if self.account(id).is_none() {
            return Ok(());
        }

        let accounts = self
            .snapshot
            .accounts
            .iter()
            .filter(|a| &a.id != id)
            .cloned()
            .collect();
        self.commit_accounts(accounts).await?;

        info!(account = %id, "deleted account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::error::{LedgerError, ValidationError};
    use crate::models::{AccountPatch, Money};
    use crate::store::LedgerStore;

    async fn store() -> LedgerStore {
        LedgerStore::in_memory(&Settings::unseeded()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_account() {
        let mut store = store().await;

        let account = store.create_account("Checking", 100.0, "USD").await.unwrap();

        assert_eq!(store.accounts(), &[account.clone()]);
        assert_eq!(account.name, "Checking");
        assert_eq!(account.balance, Money::from_units(100));
        assert_eq!(account.currency, "USD");
        assert!(account.include_in_total);
        assert!(!account.id.as_str().is_empty());
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let mut store = store().await;
        store.create_account("Savings", 10.0, "USD").await.unwrap();

        let err = store.create_account("Savings", 20.0, "EUR").await.unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.accounts().len(), 1);
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn test_required_fields() {
        let mut store = store().await;

        let err = store.create_account("  ", 0.0, "USD").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::RequiredField("Account name"))
        ));

        let err = store.create_account("Cash", 0.0, "").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::RequiredField("Account currency"))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_balance_rejected() {
        let mut store = store().await;
        for huge in [5e28, -1e16] {
            let err = store.create_account("Vault", huge, "USD").await.unwrap_err();
            assert!(matches!(
                err,
                LedgerError::Validation(ValidationError::InvalidAmount { field: "balance", .. })
            ));
        }
        assert!(store.accounts().is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_balance_rejected() {
        let mut store = store().await;
        let err = store.create_account("Cash", f64::NAN, "USD").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::InvalidAmount { .. })
        ));
        assert!(store.accounts().is_empty());
    }

    #[tokio::test]
    async fn test_update_account() {
        let mut store = store().await;
        let account = store.create_account("Cash", 5.0, "USD").await.unwrap();

        let updated = store
            .update_account(&account.id, AccountPatch::default().name("Wallet").balance(7.5))
            .await
            .unwrap();

        assert_eq!(updated.id, account.id);
        assert_eq!(updated.name, "Wallet");
        assert_eq!(updated.balance.to_string(), "7.50");
        assert_eq!(store.account(&account.id), Some(&updated));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let mut store = store().await;
        let account = store.create_account("Cash", 5.0, "USD").await.unwrap();

        store
            .update_account(&account.id, AccountPatch::default().name("Cash"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rename_collision_rejected() {
        let mut store = store().await;
        store.create_account("Cash", 5.0, "USD").await.unwrap();
        let other = store.create_account("Bank", 5.0, "USD").await.unwrap();

        let err = store
            .update_account(&other.id, AccountPatch::default().name("Cash"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.account(&other.id).unwrap().name, "Bank");
    }

    #[tokio::test]
    async fn test_update_unknown_account() {
        let mut store = store().await;
        let err = store
            .update_account(&"missing".into(), AccountPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_set_include_in_total() {
        let mut store = store().await;
        let account = store.create_account("Cash", 5.0, "USD").await.unwrap();

        let updated = store.set_include_in_total(&account.id, false).await.unwrap();
        assert!(!updated.include_in_total);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let mut store = store().await;
        let account = store.create_account("Cash", 5.0, "USD").await.unwrap();

        store.delete_account(&"missing".into()).await.unwrap();
        assert_eq!(store.revision(), 1);

        store.delete_account(&account.id).await.unwrap();
        assert!(store.accounts().is_empty());
        assert!(store.find_account("Cash").is_none());
    }
}
