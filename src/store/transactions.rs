//! Transaction operations on the ledger store
//!
//! A transaction's partition is fixed when it is created. Updates and
//! deletes locate it by id across both partitions.

use tracing::info;

use super::{required, to_money, LedgerStore};
use crate::error::{LedgerResult, ValidationError};
use crate::models::{
    Attachment, EntryKind, Transaction, TransactionDraft, TransactionId, TransactionPatch,
};

impl LedgerStore {
    pub fn transactions(&self, kind: EntryKind) -> &[Transaction] {
        self.snapshot.transactions(kind)
    }

    /// Income first, then expenses, each in stored order
    pub fn all_transactions(&self) -> Vec<(EntryKind, &Transaction)> {
        EntryKind::ALL
            .into_iter()
            .flat_map(|kind| self.transactions(kind).iter().map(move |t| (kind, t)))
            .collect()
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<(EntryKind, &Transaction)> {
        self.all_transactions().into_iter().find(|(_, t)| &t.id == id)
    }

    pub async fn create_transaction(
        &mut self,
        kind: EntryKind,
        draft: TransactionDraft,
    ) -> LedgerResult<Transaction> {
        let transaction = Transaction {
            id: TransactionId::new(),
            description: required("Transaction description", &draft.description)?,
            amount: to_money("amount", draft.amount)?,
            date: draft.date,
            account: required("Transaction account", &draft.account)?,
            category: required("Transaction category", &draft.category)?,
            attachment: draft.attachment.map(Attachment::new),
        };
        transaction.validate()?;

        let mut transactions = self.transactions(kind).to_vec();
        transactions.push(transaction.clone());
        self.commit_transactions(kind, transactions).await?;

        info!(kind = %kind, transaction = %transaction.id, "created transaction");
        Ok(transaction)
    }

    /// Apply a partial update; the partition never changes
    pub async fn update_transaction(
        &mut self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> LedgerResult<Transaction> {
        let (kind, current) = self
            .transaction(id)
            .ok_or_else(|| ValidationError::transaction_not_found(id.as_str()))?;
        let mut transaction = current.clone();

        if let Some(description) = patch.description {
            transaction.description = required("Transaction description", &description)?;
        }
        if let Some(amount) = patch.amount {
            transaction.amount = to_money("amount", amount)?;
        }
        if let Some(date) = patch.date {
            transaction.date = date;
        }
        if let Some(account) = patch.account {
            transaction.account = required("Transaction account", &account)?;
        }
        if let Some(category) = patch.category {
            transaction.category = required("Transaction category", &category)?;
        }
        if let Some(attachment) = patch.attachment {
            transaction.attachment = attachment.map(Attachment::new);
        }
        transaction.validate()?;

        let transactions = self
            .transactions(kind)
            .iter()
            .map(|t| {
                if &t.id == id {
                    transaction.clone()
                } else {
                    t.clone()
                }
            })
            .collect();
        self.commit_transactions(kind, transactions).await?;

        Ok(transaction)
    }

    /// Remove a transaction; unknown ids are ignored
    pub async fn delete_transaction(&mut self, id: &TransactionId) -> LedgerResult<()> {
        let Some((kind, _)) = self.transaction(id) else {
            return Ok(());
        };

        let transactions = self
            .transactions(kind)
            .iter()
            .filter(|t| &t.id != id)
            .cloned()
            .collect();
        self.commit_transactions(kind, transactions).await?;

        info!(kind = %kind, transaction = %id, "deleted transaction");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::config::Settings;
    use crate::models::{EntryKind, Money, TransactionDraft, TransactionPatch};
    use crate::store::LedgerStore;

    fn draft(description: &str, amount: f64) -> TransactionDraft {
        TransactionDraft::new(
            description,
            amount,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
            "Checking",
            "Food",
        )
    }

    async fn store() -> LedgerStore {
        LedgerStore::in_memory(&Settings::unseeded()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_in_partition() {
        let mut store = store().await;

        let txn = store
            .create_transaction(EntryKind::Expense, draft("Lunch", -12.5))
            .await
            .unwrap();

        assert_eq!(store.transactions(EntryKind::Expense), &[txn.clone()]);
        assert!(store.transactions(EntryKind::Income).is_empty());
        assert_eq!(txn.amount, Money::from_f64(-12.5).unwrap());
        assert_eq!(store.transaction(&txn.id).unwrap().0, EntryKind::Expense);
    }

    #[tokio::test]
    async fn test_required_fields_and_amount() {
        let mut store = store().await;

        let mut missing_account = draft("Lunch", -1.0);
        missing_account.account = " ".into();
        let err = store
            .create_transaction(EntryKind::Expense, missing_account)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = store
            .create_transaction(EntryKind::Expense, draft("Lunch", f64::INFINITY))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        assert!(store.all_transactions().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_sign_is_not_enforced() {
        let mut store = store().await;
        let txn = store
            .create_transaction(EntryKind::Expense, draft("Refund", 5.0))
            .await
            .unwrap();
        assert!(txn.amount.is_positive());
    }

    #[tokio::test]
    async fn test_attachment_round_trip() {
        let mut store = store().await;
        let txn = store
            .create_transaction(
                EntryKind::Income,
                draft("Paycheck", 100.0).with_attachment(vec![0, 159, 146, 150]),
            )
            .await
            .unwrap();

        assert_eq!(
            txn.attachment.as_ref().map(|a| a.as_bytes()),
            Some(&[0u8, 159, 146, 150][..])
        );

        let cleared = store
            .update_transaction(&txn.id, TransactionPatch::default().attachment(None))
            .await
            .unwrap();
        assert!(cleared.attachment.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_partition() {
        let mut store = store().await;
        let txn = store
            .create_transaction(EntryKind::Income, draft("Salary", 1000.0))
            .await
            .unwrap();

        let updated = store
            .update_transaction(
                &txn.id,
                TransactionPatch::default().amount(1200.0).category("Bonus"),
            )
            .await
            .unwrap();

        assert_eq!(updated.category, "Bonus");
        assert_eq!(store.transactions(EntryKind::Income), &[updated]);
        assert!(store.transactions(EntryKind::Expense).is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown() {
        let mut store = store().await;
        let err = store
            .update_transaction(&"nope".into(), TransactionPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let mut store = store().await;
        let txn = store
            .create_transaction(EntryKind::Expense, draft("Lunch", -12.0))
            .await
            .unwrap();

        store.delete_transaction(&"nope".into()).await.unwrap();
        assert_eq!(store.all_transactions().len(), 1);

        store.delete_transaction(&txn.id).await.unwrap();
        assert!(store.all_transactions().is_empty());
    }
}
