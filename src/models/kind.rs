//! Income/expense partition shared by transactions, categories and budgets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the ledger an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Both kinds, income first
    pub const ALL: [EntryKind; 2] = [EntryKind::Income, EntryKind::Expense];

    /// Parse a kind from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "expenses" | "out" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(EntryKind::parse("Income"), Some(EntryKind::Income));
        assert_eq!(EntryKind::parse(" expense "), Some(EntryKind::Expense));
        assert_eq!(EntryKind::parse("transfer"), None);
    }

    #[test]
    fn test_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntryKind::Expense).unwrap(),
            "\"expense\""
        );
    }
}
