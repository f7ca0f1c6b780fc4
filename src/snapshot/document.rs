//! Portable backup document
//!
//! One JSON object holding every entity. Transactions and budgets carry the
//! partition they belong to in a `kind` field; categories are `{kind, name}`
//! pairs. Documents are checked in two passes: the raw shape first, so a
//! missing collection is reported by name, then per-entity rules.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ImportError;
use crate::models::{Account, Budget, Category, EntryKind, Transaction};
use crate::store::LedgerSnapshot;

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Collections every document must contain
const REQUIRED_ARRAYS: [&str; 4] = ["accounts", "transactions", "categories", "budgets"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindedTransaction {
    pub kind: EntryKind,
    #[serde(flatten)]
    pub transaction: Transaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindedBudget {
    pub kind: EntryKind,
    #[serde(flatten)]
    pub budget: Budget,
}

/// Summary counts written for human readers; ignored on import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub account_count: usize,
    pub transaction_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    pub earliest_transaction: Option<DateTime<Utc>>,
    pub latest_transaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,

    #[serde(default)]
    pub app_version: String,

    pub accounts: Vec<Account>,
    pub transactions: Vec<KindedTransaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<KindedBudget>,

    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

fn malformed(msg: impl Into<String>) -> ImportError {
    ImportError::MalformedDocument(msg.into())
}

impl SnapshotDocument {
    /// Capture every collection of a snapshot
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let transactions: Vec<KindedTransaction> = EntryKind::ALL
            .into_iter()
            .flat_map(|kind| {
                snapshot
                    .transactions(kind)
                    .iter()
                    .map(move |t| KindedTransaction {
                        kind,
                        transaction: t.clone(),
                    })
            })
            .collect();

        let categories: Vec<Category> = EntryKind::ALL
            .into_iter()
            .flat_map(|kind| {
                snapshot
                    .categories(kind)
                    .iter()
                    .map(move |name| Category::new(kind, name.clone()))
            })
            .collect();

        let budgets: Vec<KindedBudget> = EntryKind::ALL
            .into_iter()
            .flat_map(|kind| {
                snapshot.budgets(kind).iter().map(move |b| KindedBudget {
                    kind,
                    budget: b.clone(),
                })
            })
            .collect();

        let dates = transactions.iter().map(|t| t.transaction.date);
        let metadata = SnapshotMetadata {
            account_count: snapshot.accounts.len(),
            transaction_count: transactions.len(),
            category_count: categories.len(),
            budget_count: budgets.len(),
            earliest_transaction: dates.clone().min(),
            latest_transaction: dates.max(),
        };

        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            accounts: snapshot.accounts.clone(),
            transactions,
            categories,
            budgets,
            metadata,
        }
    }

    /// Parse and validate a JSON document
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate a JSON value's shape and contents
    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        let object = value
            .as_object()
            .ok_or_else(|| malformed("document is not a JSON object"))?;

        for name in REQUIRED_ARRAYS {
            match object.get(name) {
                Some(Value::Array(_)) => {}
                Some(_) => return Err(malformed(format!("`{}` is not an array", name))),
                None => return Err(malformed(format!("missing `{}`", name))),
            }
        }

        let document: Self = serde_json::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    /// Entity rules plus uniqueness of ids and names
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(malformed(format!(
                "unsupported schema version {} (newest known is {})",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for account in &self.accounts {
            account
                .validate()
                .map_err(|e| malformed(format!("account {}: {}", account.id, e)))?;
            if !ids.insert(account.id.as_str()) {
                return Err(malformed(format!("duplicate account id {}", account.id)));
            }
            if !names.insert(account.name.as_str()) {
                return Err(malformed(format!("duplicate account name {}", account.name)));
            }
        }

        let mut ids = HashSet::new();
        for entry in &self.transactions {
            let txn = &entry.transaction;
            txn.validate()
                .map_err(|e| malformed(format!("transaction {}: {}", txn.id, e)))?;
            if !ids.insert(txn.id.as_str()) {
                return Err(malformed(format!("duplicate transaction id {}", txn.id)));
            }
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(malformed("category with an empty name"));
            }
            if !seen.insert((category.kind, category.name.as_str())) {
                return Err(malformed(format!("duplicate category {}", category)));
            }
        }

        let mut ids = HashSet::new();
        let mut seen = HashSet::new();
        for entry in &self.budgets {
            let budget = &entry.budget;
            budget
                .validate()
                .map_err(|e| malformed(format!("budget {}: {}", budget.id, e)))?;
            if !ids.insert(budget.id.as_str()) {
                return Err(malformed(format!("duplicate budget id {}", budget.id)));
            }
            if !seen.insert((entry.kind, budget.category.as_str())) {
                return Err(malformed(format!(
                    "duplicate {} budget for {}",
                    entry.kind, budget.category
                )));
            }
        }

        Ok(())
    }

    /// Split the document back into store collections
    pub fn into_snapshot(self) -> LedgerSnapshot {
        let mut snapshot = LedgerSnapshot {
            accounts: self.accounts,
            ..LedgerSnapshot::default()
        };

        for entry in self.transactions {
            match entry.kind {
                EntryKind::Income => snapshot.income_transactions.push(entry.transaction),
                EntryKind::Expense => snapshot.expense_transactions.push(entry.transaction),
            }
        }
        for category in self.categories {
            match category.kind {
                EntryKind::Income => snapshot.income_categories.push(category.name),
                EntryKind::Expense => snapshot.expense_categories.push(category.name),
            }
        }
        for entry in self.budgets {
            match entry.kind {
                EntryKind::Income => snapshot.income_budgets.push(entry.budget),
                EntryKind::Expense => snapshot.expense_budgets.push(entry.budget),
            }
        }

        snapshot
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "schemaVersion": 1,
            "exportedAt": "2025-01-01T00:00:00Z",
            "appVersion": "0.1.0",
            "accounts": [
                {"id": "a1", "name": "Checking", "balance": 100, "currency": "USD", "includeInTotal": true}
            ],
            "transactions": [
                {"kind": "income", "id": "t1", "description": "Pay", "amount": "2500.00",
                 "date": "2025-01-02T09:00:00Z", "account": "Checking", "category": "Salary"},
                {"kind": "expense", "id": "t2", "description": "Lunch", "amount": -12.5,
                 "date": "2025-01-03T12:00:00Z", "account": "Checking", "category": "Food",
                 "attachment": "aGVsbG8="}
            ],
            "categories": [
                {"kind": "income", "name": "Salary"},
                {"kind": "expense", "name": "Food"}
            ],
            "budgets": [
                {"kind": "expense", "id": "b1", "category": "Food", "limit": "300", "spent": "12.5"}
            ]
        })
    }

    #[test]
    fn test_parse_valid_document() {
        let doc = SnapshotDocument::from_value(minimal()).unwrap();
        let snapshot = doc.into_snapshot();

        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.income_transactions.len(), 1);
        assert_eq!(snapshot.expense_transactions[0].amount.to_string(), "-12.50");
        assert_eq!(
            snapshot.expense_transactions[0]
                .attachment
                .as_ref()
                .unwrap()
                .as_bytes(),
            b"hello"
        );
        assert_eq!(snapshot.income_categories, ["Salary"]);
        assert_eq!(snapshot.expense_budgets[0].category, "Food");
    }

    #[test]
    fn test_missing_array_is_malformed() {
        for name in REQUIRED_ARRAYS {
            let mut value = minimal();
            value.as_object_mut().unwrap().remove(name);

            let err = SnapshotDocument::from_value(value).unwrap_err();
            assert_eq!(
                err,
                ImportError::MalformedDocument(format!("missing `{}`", name))
            );
        }
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let mut value = minimal();
        value["budgets"] = json!({});
        assert!(SnapshotDocument::from_value(value).is_err());

        assert!(SnapshotDocument::parse("[1, 2]").is_err());
        assert!(SnapshotDocument::parse("{").is_err());
    }

    #[test]
    fn test_bad_entity_is_malformed() {
        let mut huge = minimal();
        huge["transactions"][1]["amount"] = json!("50000000000000000000000000000");
        let err = SnapshotDocument::from_value(huge).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument(msg) if msg.contains("t2")));

        let mut huge = minimal();
        huge["accounts"][0]["balance"] = json!("-2000000000000000");
        assert!(SnapshotDocument::from_value(huge).is_err());

        let mut value = minimal();
        value["transactions"][0]["kind"] = json!("transfer");
        assert!(SnapshotDocument::from_value(value).is_err());

        let mut value = minimal();
        value["accounts"][0]["name"] = json!("");
        assert!(SnapshotDocument::from_value(value).is_err());
    }

    #[test]
    fn test_duplicates_are_malformed() {
        let mut value = minimal();
        value["transactions"][1]["id"] = json!("t1");
        assert!(SnapshotDocument::from_value(value).is_err());

        let mut value = minimal();
        value["categories"]
            .as_array_mut()
            .unwrap()
            .push(json!({"kind": "expense", "name": "Food"}));
        assert!(SnapshotDocument::from_value(value).is_err());

        let mut value = minimal();
        value["budgets"]
            .as_array_mut()
            .unwrap()
            .push(json!({"kind": "expense", "id": "b2", "category": "Food", "limit": 1}));
        assert!(SnapshotDocument::from_value(value).is_err());
    }

    #[test]
    fn test_same_category_name_in_both_kinds_is_fine() {
        let mut value = minimal();
        value["categories"]
            .as_array_mut()
            .unwrap()
            .push(json!({"kind": "income", "name": "Food"}));
        assert!(SnapshotDocument::from_value(value).is_ok());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut value = minimal();
        value["schemaVersion"] = json!(99);
        assert!(SnapshotDocument::from_value(value).is_err());
    }

    #[test]
    fn test_export_shape() {
        let doc = SnapshotDocument::from_value(minimal()).unwrap();
        let again = SnapshotDocument::from_snapshot(&doc.clone().into_snapshot());
        let value = serde_json::to_value(&again).unwrap();

        assert_eq!(value["transactions"][1]["kind"], "expense");
        assert_eq!(value["transactions"][0]["amount"], "2500.00");
        assert_eq!(value["transactions"][1]["attachment"], "aGVsbG8=");
        assert_eq!(value["categories"][0], json!({"kind": "income", "name": "Salary"}));
        assert_eq!(again.metadata.transaction_count, 2);
        assert_eq!(again.accounts, doc.accounts);
    }
}
