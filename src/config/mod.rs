//! Configuration module for MoneyFlow
//!
//! - Path resolution for the database, fallback store and backups
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
