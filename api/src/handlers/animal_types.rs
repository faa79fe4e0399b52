//! Animal type handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AnimalType, AnimalTypeId};
use crate::error::AppError;
use crate::AppState;

use super::{positive_id, ValidJson};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Animal type create/update payload
#[derive(Debug, Deserialize)]
pub struct AnimalTypeRequest {
    #[serde(rename = "type")]
    pub name: String,
}

/// Animal type response
#[derive(Debug, Serialize)]
pub struct AnimalTypeResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub name: String,
}

impl From<AnimalType> for AnimalTypeResponse {
    fn from(animal_type: AnimalType) -> Self {
        AnimalTypeResponse {
            id: animal_type.id.0,
            name: animal_type.name,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /animals/types
pub async fn create_animal_type(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<AnimalTypeRequest>,
) -> Result<(StatusCode, Json<AnimalTypeResponse>), AppError> {
    let animal_type = state.animal_type_service.create(&request.name).await?;

    Ok((StatusCode::CREATED, Json(animal_type.into())))
}

/// GET /animals/types/:type_id
pub async fn get_animal_type(
    State(state): State<AppState>,
    Path(type_id): Path<i64>,
) -> Result<Json<AnimalTypeResponse>, AppError> {
    let type_id = positive_id(type_id, "animal type")?;

    let animal_type = state
        .animal_type_service
        .get(&AnimalTypeId(type_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", type_id)))?;

    Ok(Json(animal_type.into()))
}

/// PUT /animals/types/:type_id
pub async fn update_animal_type(
    State(state): State<AppState>,
    Path(type_id): Path<i64>,
    ValidJson(request): ValidJson<AnimalTypeRequest>,
) -> Result<Json<AnimalTypeResponse>, AppError> {
    let type_id = positive_id(type_id, "animal type")?;

    let animal_type = state
        .animal_type_service
        .update(&AnimalTypeId(type_id), &request.name)
        .await?;

    Ok(Json(animal_type.into()))
}

/// DELETE /animals/types/:type_id
pub async fn delete_animal_type(
    State(state): State<AppState>,
    Path(type_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let type_id = positive_id(type_id, "animal type")?;

    state
        .animal_type_service
        .delete(&AnimalTypeId(type_id))
        .await?;

    Ok(Json(serde_json::json!({})))
}

// ============================================================================
// Tests
// ============================================================================
