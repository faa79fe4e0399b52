//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod accounts;
pub mod animal_types;
pub mod animals;
pub mod locations;
pub mod visits;

pub use accounts::{delete_account, get_account, register, search_accounts, update_account};
pub use animal_types::{
    create_animal_type, delete_animal_type, get_animal_type, update_animal_type,
};
pub use animals::{
    add_animal_type, create_animal, delete_animal, get_animal, remove_animal_type, search_animals,
    update_animal, update_animal_types,
};
pub use locations::{create_location, delete_location, get_location, update_location};
pub use visits::{append_visit, list_visits, remove_visit, update_visit};

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppError;

/// JSON extractor that answers 400 for any malformed body
///
/// The stock `Json` rejection maps deserialization failures to 422; the
/// API contract wants a plain 400 for every invalid body.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Reject non-positive path/body ids before any business check
pub fn positive_id(id: i64, what: &str) -> Result<i64, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!("{what} id must be positive")));
    }
    Ok(id)
}

/// Common `from`/`size` slice parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl PageQuery {
    /// Validate and return `(from, size)`
    pub fn slice(&self) -> Result<(i64, i64), AppError> {
        if self.from < 0 || self.size <= 0 {
            return Err(AppError::BadRequest(
                "'from' must be >= 0 and 'size' must be > 0".to_string(),
            ));
        }
        Ok((self.from, self.size))
    }
}
