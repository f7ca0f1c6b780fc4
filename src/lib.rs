//! MoneyFlow - a local personal-finance ledger
//!
//! Accounts, income and expense transactions, categories and budgets live on
//! this device. The crate is layered bottom-up:
//!
//! - `kv`: durable key-value layer, SQLite first with a file fallback
//! - `store`: typed entity collections over the key-value layer
//! - `aggregate`: pure derivations (balances, activity feed, breakdowns,
//!   reports, budget progress)
//! - `snapshot`: whole-ledger export, import and backup files
//! - `export`: CSV output
//! - `config`, `error`, `models`: shared plumbing
//! - `cli`, `display`: the command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use moneyflow::config::{LedgerPaths, Settings};
//! use moneyflow::kv::DurableKv;
//! use moneyflow::store::LedgerStore;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut store = LedgerStore::open(DurableKv::open(&paths), &settings).await?;
//! store.create_account("Checking", 100.0, "USD").await?;
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod kv;
pub mod models;
pub mod snapshot;
pub mod store;

pub use error::LedgerError;
