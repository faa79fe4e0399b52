//! Location handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Location, LocationId, NewLocation};
use crate::error::AppError;
use crate::AppState;

use super::{positive_id, ValidJson};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Location create/update payload
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationRequest> for NewLocation {
    fn from(request: LocationRequest) -> Self {
        NewLocation {
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

/// Location response
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        LocationResponse {
            id: location.id.0,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /locations
pub async fn create_location(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LocationRequest>,
) -> Result<(StatusCode, Json<LocationResponse>), AppError> {
    let location = state.location_service.create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(location.into())))
}

/// GET /locations/:point_id
pub async fn get_location(
    State(state): State<AppState>,
    Path(point_id): Path<i64>,
) -> Result<Json<LocationResponse>, AppError> {
    let point_id = positive_id(point_id, "location")?;

    let location = state
        .location_service
        .get(&LocationId(point_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", point_id)))?;

    Ok(Json(location.into()))
}

/// PUT /locations/:point_id
pub async fn update_location(
    State(state): State<AppState>,
    Path(point_id): Path<i64>,
    ValidJson(request): ValidJson<LocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let point_id = positive_id(point_id, "location")?;

    let location = state
        .location_service
        .update(&LocationId(point_id), &request.into())
        .await?;

    Ok(Json(location.into()))
}

/// DELETE /locations/:point_id
pub async fn delete_location(
    State(state): State<AppState>,
    Path(point_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let point_id = positive_id(point_id, "location")?;

    state.location_service.delete(&LocationId(point_id)).await?;

    Ok(Json(serde_json::json!({})))
}

// ============================================================================
// Tests
// ============================================================================
