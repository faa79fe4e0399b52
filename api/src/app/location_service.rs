//! Location service
//!
//! CRUD over geographic points, guarding coordinate uniqueness and
//! refusing to delete points an animal's history still references.

use std::sync::Arc;

use crate::domain::entities::{Location, LocationId, NewLocation};
use crate::domain::ports::{AnimalRepository, LocationRepository, VisitedLocationRepository};
use crate::error::{AppError, DomainError};

/// Service for managing locations
pub struct LocationService<LR, NR, VR>
where
    LR: LocationRepository,
    NR: AnimalRepository,
    VR: VisitedLocationRepository,
{
    locations: Arc<LR>,
    animals: Arc<NR>,
    visits: Arc<VR>,
}

impl<LR, NR, VR> LocationService<LR, NR, VR>
where
    LR: LocationRepository,
    NR: AnimalRepository,
    VR: VisitedLocationRepository,
{
    pub fn new(locations: Arc<LR>, animals: Arc<NR>, visits: Arc<VR>) -> Self {
        Self {
            locations,
            animals,
            visits,
        }
    }

    /// Create a new location point
    pub async fn create(&self, location: &NewLocation) -> Result<Location, AppError> {
        validate(location)?;

        if self
            .locations
            .find_by_coordinates(location.latitude, location.longitude)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Location ({}, {}) already exists",
                location.latitude, location.longitude
            ))));
        }

        Ok(self.locations.create(location).await?)
    }

    /// Find a location by ID
    pub async fn get(&self, id: &LocationId) -> Result<Option<Location>, AppError> {
        Ok(self.locations.find_by_id(id).await?)
    }

    /// Replace a location's coordinates
    pub async fn update(
        &self,
        id: &LocationId,
        location: &NewLocation,
    ) -> Result<Location, AppError> {
        validate(location)?;

        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))?;

        if let Some(taken) = self
            .locations
            .find_by_coordinates(location.latitude, location.longitude)
            .await?
        {
            if taken.id != *id {
                return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                    "Location ({}, {}) already exists",
                    location.latitude, location.longitude
                ))));
            }
        }

        Ok(self.locations.update(id, location).await?)
    }

    /// Delete a location; rejected while an animal's history references it
    pub async fn delete(&self, id: &LocationId) -> Result<(), AppError> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))?;

        if self.animals.exists_with_chipping_location(id).await?
            || self.visits.exists_for_location(id).await?
        {
            return Err(AppError::BadRequest(
                "location is part of an animal's history".to_string(),
            ));
        }

        Ok(self.locations.delete(id).await?)
    }
}

fn validate(location: &NewLocation) -> Result<(), AppError> {
    if !location.in_bounds() {
        return Err(AppError::BadRequest(
            "latitude must be in [-90, 90] and longitude in [-180, 180]".to_string(),
        ));
    }
    Ok(())
}
