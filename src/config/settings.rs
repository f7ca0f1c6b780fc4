//! User settings for MoneyFlow
//!
//! Preferences that shape defaults: reporting currency, feed sizes, the
//! categories seeded into a fresh ledger, and backup retention.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of backup documents to keep when pruning
    pub keep: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep: 10 }
    }
}

/// User settings for MoneyFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency used for new accounts when none is given
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Number of entries in the recent-activity feed
    #[serde(default = "default_feed_limit")]
    pub recent_activity_limit: usize,

    /// Number of entries in the largest-expenses report section
    #[serde(default = "default_feed_limit")]
    pub largest_expenses_limit: usize,

    /// Income categories seeded when none have been stored yet
    #[serde(default = "default_income_categories")]
    pub default_income_categories: Vec<String>,

    /// Expense categories seeded when none have been stored yet
    #[serde(default = "default_expense_categories")]
    pub default_expense_categories: Vec<String>,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_feed_limit() -> usize {
    5
}

fn default_income_categories() -> Vec<String> {
    vec!["Salary".to_string(), "Investments".to_string()]
}

fn default_expense_categories() -> Vec<String> {
    vec![
        "Food".to_string(),
        "Rent".to_string(),
        "Transportation".to_string(),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            recent_activity_limit: default_feed_limit(),
            largest_expenses_limit: default_feed_limit(),
            default_income_categories: default_income_categories(),
            default_expense_categories: default_expense_categories(),
            backup_retention: BackupRetention::default(),
        }
    }
}

impl Settings {
    /// Settings that seed nothing, for an empty ledger
    pub fn unseeded() -> Self {
        Self {
            default_income_categories: Vec::new(),
            default_expense_categories: Vec::new(),
            ..Self::default()
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
