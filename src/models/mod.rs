//! Core data models for the ledger
//!
//! Accounts, transactions, categories and budgets, plus the value types they
//! share (identifiers, money, attachments, the income/expense partition).

pub mod account;
pub mod attachment;
pub mod budget;
pub mod category;
pub mod ids;
pub mod kind;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountPatch};
pub use attachment::Attachment;
pub use budget::{Budget, BudgetPatch};
pub use category::Category;
pub use ids::{AccountId, BudgetId, TransactionId};
pub use kind::EntryKind;
pub use money::Money;
pub use transaction::{Transaction, TransactionDraft, TransactionPatch};
