//! Account handlers
//!
//! Registration plus account lookup, search, update and deletion.
//! Update and delete are restricted to the authenticated account itself.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AccountData;
use crate::auth;
use crate::domain::entities::{Account, AccountFilter, AccountId};
use crate::error::AppError;
use crate::AppState;

use super::{positive_id, PageQuery, ValidJson};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration / update payload
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl From<AccountRequest> for AccountData {
    fn from(request: AccountRequest) -> Self {
        AccountData {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Account response; the password digest never leaves the server
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id.0,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
        }
    }
}

/// Query parameters for account search
#[derive(Debug, Deserialize)]
pub struct AccountSearchQuery {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /registration
///
/// Open endpoint; a caller presenting valid credentials is turned away.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidJson(request): ValidJson<AccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    if let Some(Some(credentials)) = auth::extract_credentials(&headers) {
        if state
            .account_service
            .authenticate(&credentials.email, &credentials.password)
            .await?
            .is_some()
        {
            return Err(AppError::Forbidden);
        }
    }

    let account = state.account_service.register(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /accounts/:account_id
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    let account_id = positive_id(account_id, "account")?;

    let account = state
        .account_service
        .get(&AccountId(account_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", account_id)))?;

    Ok(Json(account.into()))
}

/// GET /accounts/search
pub async fn search_accounts(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(query): Query<AccountSearchQuery>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let (from, size) = page.slice()?;

    let filter = AccountFilter {
        first_name: query.first_name,
        last_name: query.last_name,
        email: query.email,
    };

    let accounts = state.account_service.search(&filter, from, size).await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// PUT /accounts/:account_id
pub async fn update_account(
    State(state): State<AppState>,
    Extension(actor): Extension<Account>,
    Path(account_id): Path<i64>,
    ValidJson(request): ValidJson<AccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let account_id = positive_id(account_id, "account")?;

    let account = state
        .account_service
        .update(&AccountId(account_id), &request.into(), &actor)
        .await?;

    Ok(Json(account.into()))
}

/// DELETE /accounts/:account_id
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(actor): Extension<Account>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let account_id = positive_id(account_id, "account")?;

    state
        .account_service
        .delete(&AccountId(account_id), &actor)
        .await?;

    Ok(Json(serde_json::json!({})))
}

// ============================================================================
// Tests
// ============================================================================
