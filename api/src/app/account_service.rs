//! Account service
//!
//! Registration, credential checks, and account administration.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::entities::{Account, AccountFilter, AccountId, NewAccount};
use crate::domain::ports::{AccountRepository, AnimalRepository};
use crate::error::{AppError, DomainError};

/// Raw registration/update payload before validation
#[derive(Debug, Clone)]
pub struct AccountData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Service for managing accounts
pub struct AccountService<AR, NR>
where
    AR: AccountRepository,
    NR: AnimalRepository,
{
    accounts: Arc<AR>,
    animals: Arc<NR>,
}

impl<AR, NR> AccountService<AR, NR>
where
    AR: AccountRepository,
    NR: AnimalRepository,
{
    pub fn new(accounts: Arc<AR>, animals: Arc<NR>) -> Self {
        Self { accounts, animals }
    }

    /// Register a new account
    pub async fn register(&self, data: &AccountData) -> Result<Account, AppError> {
        let account = validate(data)?;

        if self.accounts.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Account with email '{}' already exists",
                account.email
            ))));
        }

        Ok(self.accounts.create(&account).await?)
    }

    /// Look an account up by its Basic credentials
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .find_by_credentials(email, &hash_password(password))
            .await?)
    }

    /// Find an account by ID
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.find_by_id(id).await?)
    }

    /// Case-insensitive substring search, ordered by id
    pub async fn search(
        &self,
        filter: &AccountFilter,
        from: i64,
        size: i64,
    ) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts.search(filter, from, size).await?)
    }

    /// Replace an account's data; callers may only touch their own account
    pub async fn update(
        &self,
        id: &AccountId,
        data: &AccountData,
        actor: &Account,
    ) -> Result<Account, AppError> {
        let account = validate(data)?;

        if *id != actor.id {
            return Err(AppError::Forbidden);
        }

        if let Some(other) = self.accounts.find_by_email(&account.email).await? {
            if other.id != *id {
                return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                    "Account with email '{}' already exists",
                    account.email
                ))));
            }
        }

        Ok(self.accounts.update(id, &account).await?)
    }

    /// Delete an account; rejected while any animal still references it
    pub async fn delete(&self, id: &AccountId, actor: &Account) -> Result<(), AppError> {
        if self.animals.exists_with_chipper(id).await? {
            return Err(AppError::BadRequest(
                "account is the chipper of an animal".to_string(),
            ));
        }

        if *id != actor.id {
            return Err(AppError::Forbidden);
        }

        Ok(self.accounts.delete(id).await?)
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Trim and validate a payload into a storable account
fn validate(data: &AccountData) -> Result<NewAccount, AppError> {
    let first_name = data.first_name.trim();
    let last_name = data.last_name.trim();
    let email = data.email.trim();
    let password = data.password.trim();

    if first_name.is_empty() || last_name.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "firstName, lastName and password must not be blank".to_string(),
        ));
    }
    if email.is_empty() || !email_regex().is_match(email) {
        return Err(AppError::BadRequest(format!(
            "'{email}' is not a valid email address"
        )));
    }

    Ok(NewAccount {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password),
    })
}
