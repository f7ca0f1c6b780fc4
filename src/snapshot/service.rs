//! Whole-store export and import

use tracing::info;

use super::document::SnapshotDocument;
use crate::error::LedgerResult;
use crate::store::LedgerStore;

/// Every entity in the store as one self-describing document
pub fn export_snapshot(store: &LedgerStore) -> SnapshotDocument {
    SnapshotDocument::from_snapshot(store.snapshot())
}

/// Replace every collection with the document's contents
///
/// The document is validated before anything is written, and all seven
/// collections go out in a single batch: either all are overwritten or none.
pub async fn import_snapshot(store: &mut LedgerStore, document: SnapshotDocument) -> LedgerResult<()> {
    document.validate()?;
    let snapshot = document.into_snapshot();
    let accounts = snapshot.accounts.len();
    store.replace_all(snapshot).await?;
    info!(accounts, "imported snapshot");
    Ok(())
}

/// Parse a JSON document and import it
pub async fn import_json(store: &mut LedgerStore, json: &str) -> LedgerResult<()> {
    let document = SnapshotDocument::parse(json)?;
    import_snapshot(store, document).await
}
