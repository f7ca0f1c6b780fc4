//! Backup files on disk
//!
//! Each backup is a snapshot document named `backup-YYYYMMDD-HHMMSS-mmm.json`
//! in the ledger's backup directory. Retention keeps the newest N.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::document::SnapshotDocument;
use super::service::{export_snapshot, import_snapshot};
use crate::config::paths::LedgerPaths;
use crate::config::settings::BackupRetention;
use crate::error::{LedgerError, LedgerResult};
use crate::kv::file_io::write_bytes_atomic;
use crate::store::LedgerStore;

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages backup creation, listing, restore and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: &LedgerPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Write a backup of the whole store
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, store: &LedgerStore) -> LedgerResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        let document = export_snapshot(store);
        let filename = backup_filename(document.exported_at);
        let backup_path = self.backup_dir.join(&filename);

        let json = document
            .to_json_pretty()
            .map_err(|e| LedgerError::Export(format!("Failed to serialize backup: {}", e)))?;
        write_bytes_atomic(&backup_path, json.as_bytes())
            .map_err(|e| LedgerError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(backup = %filename, "created backup");
        Ok(backup_path)
    }

    /// Create a backup, then prune old ones
    pub fn create_backup_with_retention(
        &self,
        store: &LedgerStore,
    ) -> LedgerResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(store)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> LedgerResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup directory: {}", e)))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;
            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Look up a backup by bare filename; anything that is not a plain name is not found
    pub fn get_backup(&self, filename: &str) -> LedgerResult<Option<BackupInfo>> {
        if !is_plain_filename(filename) {
            return Ok(None);
        }
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    pub fn get_latest_backup(&self) -> LedgerResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Delete all but the newest `keep` backups
    pub fn enforce_retention(&self) -> LedgerResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();
        for backup in self.list_backups()?.into_iter().skip(self.retention.keep) {
            fs::remove_file(&backup.path)
                .map_err(|e| LedgerError::Io(format!("Failed to delete old backup: {}", e)))?;
            debug!(backup = %backup.filename, "pruned backup");
            deleted.push(backup.path);
        }
        Ok(deleted)
    }

    /// Read and validate a backup file
    pub fn read_backup(&self, path: &Path) -> LedgerResult<SnapshotDocument> {
        let contents = fs::read_to_string(path)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup file: {}", e)))?;
        Ok(SnapshotDocument::parse(&contents)?)
    }

    /// Replace the store's contents with a backup
    pub async fn restore(&self, store: &mut LedgerStore, path: &Path) -> LedgerResult<SnapshotDocument> {
        let document = self.read_backup(path)?;
        import_snapshot(store, document.clone()).await?;
        info!(backup = %path.display(), "restored backup");
        Ok(document)
    }
}

fn backup_filename(at: DateTime<Utc>) -> String {
    format!(
        "backup-{}-{:03}.json",
        at.format("%Y%m%d-%H%M%S"),
        at.timestamp_subsec_millis()
    )
}

fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let (date_part, time_part, millis_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part.get(0..4)?.parse().ok()?,
        date_part.get(4..6)?.parse().ok()?,
        date_part.get(6..8)?.parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_milli_opt(
        time_part.get(0..2)?.parse().ok()?,
        time_part.get(2..4)?.parse().ok()?,
        time_part.get(4..6)?.parse().ok()?,
        millis_part.parse().ok()?,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn create_test_manager(keep: usize) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        (BackupManager::new(&paths, BackupRetention { keep }), temp_dir)
    }

    async fn store() -> LedgerStore {
        LedgerStore::in_memory(&Settings::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (manager, _temp) = create_test_manager(10);
        let store = store().await;

        assert!(manager.get_latest_backup().unwrap().is_none());

        manager.create_backup(&store).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let newest = manager.create_backup(&store).unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at >= backups[1].created_at);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, newest);
    }

    #[tokio::test]
    async fn test_backup_written_without_leftovers() {
        let (manager, _temp) = create_test_manager(10);
        let store = store().await;

        let path = manager.create_backup(&store).unwrap();

        let names: Vec<String> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".json"));
        assert!(manager.read_backup(&path).is_ok());
    }

    #[tokio::test]
    async fn test_get_backup_rejects_paths() {
        let (manager, temp) = create_test_manager(10);
        let store = store().await;
        let path = manager.create_backup(&store).unwrap();
        let filename = path.file_name().unwrap().to_string_lossy().to_string();

        // A valid backup name reachable only by escaping the backup directory
        let outside = temp.path().join(&filename);
        fs::copy(&path, &outside).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(manager.get_backup(&format!("../{}", filename)).unwrap().is_none());
        assert!(manager
            .get_backup(&outside.to_string_lossy())
            .unwrap()
            .is_none());
        assert!(manager.get_backup("..").unwrap().is_none());
        assert!(manager.get_backup("").unwrap().is_none());

        fs::copy(&outside, &path).unwrap();
        assert!(manager.get_backup(&filename).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_retention() {
        let (manager, _temp) = create_test_manager(3);
        let store = store().await;

        for _ in 0..5 {
            manager.create_backup(&store).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_restore_replaces_store() {
        let (manager, _temp) = create_test_manager(10);
        let mut store = store().await;
        store.create_account("Checking", 10.0, "USD").await.unwrap();
        let backup = manager.create_backup(&store).unwrap();

        store.create_account("Savings", 20.0, "USD").await.unwrap();
        manager.restore(&mut store, &backup).await.unwrap();

        let names: Vec<&str> = store.accounts().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Checking"]);
    }

    #[tokio::test]
    async fn test_restore_rejects_corrupt_file() {
        let (manager, temp) = create_test_manager(10);
        let mut store = store().await;
        let path = temp.path().join("backups").join("backup-20250101-000000-000.json");
        fs::write(&path, "{\"accounts\": []}").unwrap();

        let err = manager.restore(&mut store, &path).await.unwrap_err();
        assert!(err.is_malformed_document());
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let (manager, temp) = create_test_manager(10);
        fs::write(temp.path().join("backups").join("notes.txt"), "x").unwrap();
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_backup("notes.txt").unwrap().is_none());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.day(), 27);
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251127").is_none());
        assert!(parse_backup_timestamp("2025112-143022-000").is_none());
    }

    #[test]
    fn test_filename_round_trip() {
        let at = Utc::now();
        let name = backup_filename(at);
        let stamp = name.strip_prefix("backup-").unwrap().strip_suffix(".json").unwrap();
        let parsed = parse_backup_timestamp(stamp).unwrap();
        assert_eq!(parsed.timestamp_millis(), at.timestamp_millis());
    }
}
