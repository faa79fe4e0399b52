//! HTTP Basic authentication middleware
//!
//! Validates `Authorization: Basic base64(email:password)` headers and
//! injects the authenticated Account into request extensions. Two
//! flavours: `required_auth` for mutating endpoints, `optional_auth` for
//! reads, where anonymous requests pass through but credentials that are
//! present and wrong are still rejected.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AppError;
use crate::AppState;

/// Decoded credentials from an `Authorization: Basic` header
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Extract Basic credentials from the request headers
///
/// Outer `None` means no Authorization header was sent at all; inner
/// `None` means a header was sent but is not a well-formed Basic pair.
pub fn extract_credentials(headers: &HeaderMap) -> Option<Option<Credentials>> {
    let header = headers.get("Authorization")?;
    Some(header.to_str().ok().and_then(parse_basic))
}

fn parse_basic(header: &str) -> Option<Credentials> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Authentication middleware for mutating endpoints
///
/// Requires valid credentials and injects the Account into request
/// extensions.
pub async fn required_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = extract_credentials(request.headers())
        .flatten()
        .ok_or(AppError::Unauthorized)?;

    let account = state
        .account_service
        .authenticate(&credentials.email, &credentials.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

/// Authentication middleware for read endpoints
///
/// Anonymous requests pass through without an Account; non-empty but
/// malformed or wrong credentials are rejected.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    match extract_credentials(request.headers()) {
        None => Ok(next.run(request).await),
        Some(credentials) => {
            let credentials = credentials.ok_or(AppError::Unauthorized)?;

            let account = state
                .account_service
                .authenticate(&credentials.email, &credentials.password)
                .await?
                .ok_or(AppError::Unauthorized)?;

            request.extensions_mut().insert(account);

            Ok(next.run(request).await)
        }
    }
}
