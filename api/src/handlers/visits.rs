//! Visited-location handlers
//!
//! The HTTP face of the visit ledger: list, append, update and remove
//! entries of one animal's route.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::VisitQuery;
use crate::domain::entities::{AnimalId, LocationId, VisitedLocation, VisitedLocationId};
use crate::error::AppError;
use crate::AppState;

use super::{positive_id, PageQuery, ValidJson};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Ledger entry response
#[derive(Debug, Serialize)]
pub struct VisitedLocationResponse {
    pub id: i64,
    #[serde(rename = "visitDateTime")]
    pub visit_datetime: DateTime<Utc>,
    #[serde(rename = "locationId")]
    pub location_id: i64,
}

impl From<VisitedLocation> for VisitedLocationResponse {
    fn from(visit: VisitedLocation) -> Self {
        VisitedLocationResponse {
            id: visit.id.0,
            visit_datetime: visit.visit_datetime,
            location_id: visit.location_id.0,
        }
    }
}

/// Query parameters for listing an animal's visits
#[derive(Debug, Deserialize)]
pub struct VisitSearchQuery {
    #[serde(rename = "startDateTime")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(rename = "endDateTime")]
    pub end_datetime: Option<DateTime<Utc>>,
}

/// Payload for repointing an entry at a new location
#[derive(Debug, Deserialize)]
pub struct UpdateVisitRequest {
    #[serde(rename = "visitedLocationPointId")]
    pub visited_location_point_id: i64,
    #[serde(rename = "locationPointId")]
    pub location_point_id: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /animals/:animal_id/locations
pub async fn list_visits(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
    Query(page): Query<PageQuery>,
    Query(query): Query<VisitSearchQuery>,
) -> Result<Json<Vec<VisitedLocationResponse>>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let (from, size) = page.slice()?;

    let visits = state
        .visit_service
        .list(
            &AnimalId(animal_id),
            &VisitQuery {
                start: query.start_datetime,
                end: query.end_datetime,
                from,
                size,
            },
        )
        .await?;

    Ok(Json(visits.into_iter().map(Into::into).collect()))
}

/// POST /animals/:animal_id/locations/:point_id
pub async fn append_visit(
    State(state): State<AppState>,
    Path((animal_id, point_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<VisitedLocationResponse>), AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let point_id = positive_id(point_id, "location")?;

    let visit = state
        .visit_service
        .append(&AnimalId(animal_id), &LocationId(point_id))
        .await?;

    Ok((StatusCode::CREATED, Json(visit.into())))
}

/// PUT /animals/:animal_id/locations
pub async fn update_visit(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
    ValidJson(request): ValidJson<UpdateVisitRequest>,
) -> Result<Json<VisitedLocationResponse>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let entry_id = positive_id(request.visited_location_point_id, "visited location")?;
    let location_id = positive_id(request.location_point_id, "location")?;

    let visit = state
        .visit_service
        .update(
            &AnimalId(animal_id),
            &VisitedLocationId(entry_id),
            &LocationId(location_id),
        )
        .await?;

    Ok(Json(visit.into()))
}

/// DELETE /animals/:animal_id/locations/:visited_point_id
pub async fn remove_visit(
    State(state): State<AppState>,
    Path((animal_id, visited_point_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let visited_point_id = positive_id(visited_point_id, "visited location")?;

    state
        .visit_service
        .remove(&AnimalId(animal_id), &VisitedLocationId(visited_point_id))
        .await?;

    Ok(Json(serde_json::json!({})))
}

// ============================================================================
// Tests
// ============================================================================
