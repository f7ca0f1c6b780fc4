//! Category model
//!
//! Categories are bare names in two independent namespaces, one per
//! [`EntryKind`]. The store keeps each namespace as a list of strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::kind::EntryKind;
use crate::error::ValidationError;

/// A category name tagged with its namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    pub kind: EntryKind,
    pub name: String,
}

impl Category {
    pub fn new(kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Trim a submitted category name, rejecting blanks
pub fn normalize_category_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::RequiredField("Category name"));
    }
    Ok(name.to_string())
}
