//! Snapshot and backup service
//!
//! Serializes the whole entity store into one portable JSON document and
//! restores it, either from a caller-supplied document or from the rolling
//! backup files kept in the ledger's backup directory.

pub mod document;
pub mod manager;
pub mod service;

pub use document::{KindedBudget, KindedTransaction, SnapshotDocument, SNAPSHOT_SCHEMA_VERSION};
pub use manager::{BackupInfo, BackupManager};
pub use service::{export_snapshot, import_json, import_snapshot};
