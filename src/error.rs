//! Error types for the MoneyFlow ledger
//!
//! Three families, one per layer, unified under [`LedgerError`]:
//! - [`ValidationError`]: rejected input, never reaches the persistence layer
//! - [`StoreError`]: backend failures in the durable key-value layer
//! - [`ImportError`]: malformed backup documents

use thiserror::Error;

/// Input rejected by the entity store before anything is persisted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Another entity already uses this name in the same namespace
    #[error("{entity_type} already exists: {name}")]
    DuplicateName {
        entity_type: &'static str,
        name: String,
    },

    /// A required field was empty
    #[error("{0} is required")]
    RequiredField(&'static str),

    /// An amount was not a finite number or violated its range
    #[error("Invalid {field}: {reason}")]
    InvalidAmount { field: &'static str, reason: String },

    /// The referenced entity does not exist
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl ValidationError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate-name error
    pub fn duplicate(entity_type: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            entity_type,
            name: name.into(),
        }
    }

    /// Create an invalid-amount error
    pub fn invalid_amount(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures of the durable key-value layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The structured backend could not be opened or used
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A write failed on every available backend
    #[error("Write failed for '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    /// A stored value could not be decoded
    #[error("Stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    /// Create a write failure for a key
    pub fn write_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}

/// Rejected snapshot imports
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Required fields are missing or have the wrong type
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Import(#[from] ImportError),

    /// Unparseable command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the key-value layer (backups, exports)
    #[error("I/O error: {0}")]
    Io(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Validation(ValidationError::NotFound { .. }))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a duplicate-name rejection
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Validation(ValidationError::DuplicateName { .. }))
    }

    /// Check if this is a malformed import
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, Self::Import(ImportError::MalformedDocument(_)))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
