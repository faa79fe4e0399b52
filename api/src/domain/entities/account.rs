//! Account domain entity
//!
//! A registered user of the API. Accounts authenticate with HTTP Basic
//! credentials and act as chippers for the animals they register.

use serde::{Deserialize, Serialize};

/// Unique identifier for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// SHA-256 hex digest of the password; never leaves the service layer
    pub password_hash: String,
}

/// Data needed to create or replace an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Case-insensitive substring filters for account search
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
