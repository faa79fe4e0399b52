//! Animal handlers
//!
//! Registration, lookup, search, lifecycle updates, deletion and the
//! type-membership operations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::AnimalData;
use crate::domain::entities::{
    Animal, AnimalFilter, AnimalId, AnimalTypeId, Gender, LifeStatus, NewAnimal,
};
use crate::error::AppError;
use crate::AppState;

use super::{positive_id, PageQuery, ValidJson};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Animal registration payload
#[derive(Debug, Deserialize)]
pub struct CreateAnimalRequest {
    #[serde(rename = "animalTypes")]
    pub animal_types: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    #[serde(rename = "chipperId")]
    pub chipper_id: i64,
    #[serde(rename = "chippingLocationId")]
    pub chipping_location_id: i64,
}

impl From<CreateAnimalRequest> for NewAnimal {
    fn from(request: CreateAnimalRequest) -> Self {
        NewAnimal {
            animal_types: request
                .animal_types
                .into_iter()
                .map(AnimalTypeId)
                .collect(),
            weight: request.weight,
            length: request.length,
            height: request.height,
            gender: request.gender,
            chipper_id: request.chipper_id.into(),
            chipping_location_id: request.chipping_location_id.into(),
        }
    }
}

/// Animal update payload
#[derive(Debug, Deserialize)]
pub struct UpdateAnimalRequest {
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    #[serde(rename = "lifeStatus")]
    pub life_status: LifeStatus,
    #[serde(rename = "chipperId")]
    pub chipper_id: i64,
    #[serde(rename = "chippingLocationId")]
    pub chipping_location_id: i64,
}

impl From<UpdateAnimalRequest> for AnimalData {
    fn from(request: UpdateAnimalRequest) -> Self {
        AnimalData {
            weight: request.weight,
            length: request.length,
            height: request.height,
            gender: request.gender,
            life_status: request.life_status,
            chipper_id: request.chipper_id,
            chipping_location_id: request.chipping_location_id,
        }
    }
}

/// Payload for replacing one of an animal's types
#[derive(Debug, Deserialize)]
pub struct UpdateAnimalTypesRequest {
    #[serde(rename = "oldTypeId")]
    pub old_type_id: i64,
    #[serde(rename = "newTypeId")]
    pub new_type_id: i64,
}

/// Animal response
#[derive(Debug, Serialize)]
pub struct AnimalResponse {
    pub id: i64,
    #[serde(rename = "animalTypes")]
    pub animal_types: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    #[serde(rename = "lifeStatus")]
    pub life_status: LifeStatus,
    #[serde(rename = "chippingDateTime")]
    pub chipping_datetime: DateTime<Utc>,
    #[serde(rename = "chipperId")]
    pub chipper_id: i64,
    #[serde(rename = "chippingLocationId")]
    pub chipping_location_id: i64,
    #[serde(rename = "visitedLocations")]
    pub visited_locations: Vec<i64>,
    #[serde(rename = "deathDateTime")]
    pub death_datetime: Option<DateTime<Utc>>,
}

impl From<Animal> for AnimalResponse {
    fn from(animal: Animal) -> Self {
        AnimalResponse {
            id: animal.id.0,
            animal_types: animal.animal_types.into_iter().map(|t| t.0).collect(),
            weight: animal.weight,
            length: animal.length,
            height: animal.height,
            gender: animal.gender,
            life_status: animal.life_status,
            chipping_datetime: animal.chipping_datetime,
            chipper_id: animal.chipper_id.0,
            chipping_location_id: animal.chipping_location_id.0,
            visited_locations: animal
                .visited_locations
                .into_iter()
                .map(|v| v.0)
                .collect(),
            death_datetime: animal.death_datetime,
        }
    }
}

/// Query parameters for animal search
#[derive(Debug, Deserialize)]
pub struct AnimalSearchQuery {
    #[serde(rename = "startDateTime")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(rename = "endDateTime")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(rename = "chipperId")]
    pub chipper_id: Option<i64>,
    #[serde(rename = "chippingLocationId")]
    pub chipping_location_id: Option<i64>,
    #[serde(rename = "lifeStatus")]
    pub life_status: Option<LifeStatus>,
    pub gender: Option<Gender>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /animals
pub async fn create_animal(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateAnimalRequest>,
) -> Result<(StatusCode, Json<AnimalResponse>), AppError> {
    let animal = state.animal_service.create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(animal.into())))
}

/// GET /animals/:animal_id
pub async fn get_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
) -> Result<Json<AnimalResponse>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;

    let animal = state
        .animal_service
        .get(&AnimalId(animal_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", animal_id)))?;

    Ok(Json(animal.into()))
}

/// GET /animals/search
pub async fn search_animals(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(query): Query<AnimalSearchQuery>,
) -> Result<Json<Vec<AnimalResponse>>, AppError> {
    let (from, size) = page.slice()?;

    let filter = AnimalFilter {
        chipped_after: query.start_datetime,
        chipped_before: query.end_datetime,
        chipper_id: query.chipper_id.map(Into::into),
        chipping_location_id: query.chipping_location_id.map(Into::into),
        life_status: query.life_status,
        gender: query.gender,
    };

    let animals = state.animal_service.search(&filter, from, size).await?;

    Ok(Json(animals.into_iter().map(Into::into).collect()))
}

/// PUT /animals/:animal_id
pub async fn update_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
    ValidJson(request): ValidJson<UpdateAnimalRequest>,
) -> Result<Json<AnimalResponse>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;

    let animal = state
        .animal_service
        .update(&AnimalId(animal_id), &request.into())
        .await?;

    Ok(Json(animal.into()))
}

/// DELETE /animals/:animal_id
pub async fn delete_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;

    state.animal_service.delete(&AnimalId(animal_id)).await?;

    Ok(Json(serde_json::json!({})))
}

/// POST /animals/:animal_id/types/:type_id
pub async fn add_animal_type(
    State(state): State<AppState>,
    Path((animal_id, type_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<AnimalResponse>), AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let type_id = positive_id(type_id, "animal type")?;

    let animal = state
        .animal_service
        .add_type(&AnimalId(animal_id), &AnimalTypeId(type_id))
        .await?;

    Ok((StatusCode::CREATED, Json(animal.into())))
}

/// PUT /animals/:animal_id/types
pub async fn update_animal_types(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
    ValidJson(request): ValidJson<UpdateAnimalTypesRequest>,
) -> Result<Json<AnimalResponse>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let old_type_id = positive_id(request.old_type_id, "animal type")?;
    let new_type_id = positive_id(request.new_type_id, "animal type")?;

    let animal = state
        .animal_service
        .update_type(
            &AnimalId(animal_id),
            &AnimalTypeId(old_type_id),
            &AnimalTypeId(new_type_id),
        )
        .await?;

    Ok(Json(animal.into()))
}

/// DELETE /animals/:animal_id/types/:type_id
pub async fn remove_animal_type(
    State(state): State<AppState>,
    Path((animal_id, type_id)): Path<(i64, i64)>,
) -> Result<Json<AnimalResponse>, AppError> {
    let animal_id = positive_id(animal_id, "animal")?;
    let type_id = positive_id(type_id, "animal type")?;

    let animal = state
        .animal_service
        .remove_type(&AnimalId(animal_id), &AnimalTypeId(type_id))
        .await?;

    Ok(Json(animal.into()))
}

// ============================================================================
// Tests
// ============================================================================
