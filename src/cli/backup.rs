//! Backup and snapshot CLI commands

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tabled::Tabled;

use crate::config::{LedgerPaths, Settings};
use crate::display::table;
use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::snapshot::{export_snapshot, import_json, BackupManager};
use crate::store::LedgerStore;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup, pruning old ones
    Create,

    /// List all available backups
    List,

    /// Replace the ledger with a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups according to retention policy
    Prune,

    /// Write the whole ledger as a snapshot document
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Replace the ledger with a snapshot document
    Import {
        /// Snapshot file path
        input: PathBuf,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Handle a backup command
pub async fn handle_backup_command(
    store: &mut LedgerStore,
    paths: &LedgerPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> LedgerResult<()> {
    let manager = BackupManager::new(paths, settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention(store)?;
            println!("Backup created: {}", display_name(&backup_path));
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s)", pruned.len());
            }
        }

        BackupCommands::List => {
            let rows = manager
                .list_backups()?
                .into_iter()
                .enumerate()
                .map(|(i, b)| BackupRow {
                    position: i + 1,
                    filename: b.filename,
                    created: b.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    size: format_size(b.size_bytes),
                })
                .collect();
            print!("{}", table(rows, "No backups found."));
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let document = manager.read_backup(&backup_path)?;
            document.validate()?;

            if !force {
                println!(
                    "Backup {} holds {} accounts and {} transactions.",
                    display_name(&backup_path),
                    document.accounts.len(),
                    document.transactions.len(),
                );
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force");
                return Ok(());
            }

            let safety = manager.create_backup(store)?;
            println!("Saved current data to {}", display_name(&safety));

            manager.restore(store, &backup_path).await?;
            println!("Restored from {}", display_name(&backup_path));
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!(
                "Deleted {} backup(s); keeping the newest {}",
                deleted.len(),
                settings.backup_retention.keep
            );
        }

        BackupCommands::Export { output } => {
            let json = export_snapshot(store)
                .to_json_pretty()
                .map_err(|e| LedgerError::Export(e.to_string()))?;
            std::fs::write(&output, json).map_err(|e| {
                LedgerError::Export(format!("Failed to write {}: {}", output.display(), e))
            })?;
            println!("Exported ledger to {}", output.display());
        }

        BackupCommands::Import { input, force } => {
            let json = std::fs::read_to_string(&input).map_err(|e| {
                LedgerError::Io(format!("Failed to read {}: {}", input.display(), e))
            })?;
            if !force {
                println!("WARNING: Importing replaces ALL current data!");
                println!("To proceed, run again with --force");
                return Ok(());
            }
            import_json(store, &json).await?;
            println!("Imported ledger from {}", input.display());
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve `latest`, a path, or a filename in the backup directory
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> LedgerResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| ValidationError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            }
            .into());
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    for candidate in [backup.to_string(), format!("{}.json", backup)] {
        if let Some(info) = manager.get_backup(&candidate)? {
            return Ok(info.path);
        }
    }

    Err(ValidationError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    }
    .into())
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::BackupRetention;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[tokio::test]
    async fn test_resolve_backup_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = BackupManager::new(&paths, BackupRetention::default());
        let store = LedgerStore::in_memory(&Settings::default()).await.unwrap();

        let err = resolve_backup_path(&manager, "latest").unwrap_err();
        assert!(err.is_not_found());

        let created = manager.create_backup(&store).unwrap();
        let name = display_name(&created);
        let stem = name.trim_end_matches(".json");

        assert_eq!(resolve_backup_path(&manager, "latest").unwrap(), created);
        assert_eq!(resolve_backup_path(&manager, &name).unwrap(), created);
        assert_eq!(resolve_backup_path(&manager, stem).unwrap(), created);
    }
}
