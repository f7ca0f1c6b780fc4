//! Account model
//!
//! An account carries a free-standing running balance. It is never derived
//! from transactions; the collaborator edits it directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;
use crate::error::ValidationError;

/// A financial account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name, unique across accounts
    pub name: String,

    /// Current balance
    pub balance: Money,

    /// Currency code (e.g. "USD")
    pub currency: String,

    /// Whether the balance counts toward the dashboard total
    #[serde(default = "default_include_in_total")]
    pub include_in_total: bool,
}

fn default_include_in_total() -> bool {
    true
}

impl Account {
    /// Create a new account, included in the total by default
    pub fn new(name: impl Into<String>, balance: Money, currency: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            balance,
            currency: currency.into(),
            include_in_total: true,
        }
    }

    /// Validate the account fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredField("Account name"));
        }

        if self.currency.trim().is_empty() {
            return Err(ValidationError::RequiredField("Account currency"));
        }

        self.balance.ensure_within_limit("balance")?;
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance.format_with_currency(&self.currency))
    }
}

/// Partial update for an account; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub include_in_total: Option<bool>,
}

impl AccountPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn include_in_total(mut self, include: bool) -> Self {
        self.include_in_total = Some(include);
        self
    }
}
