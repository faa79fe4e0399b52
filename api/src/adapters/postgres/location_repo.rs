//! PostgreSQL adapter for LocationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::entities::{Location, LocationId, NewLocation};
use crate::domain::ports::LocationRepository;
use crate::entity::locations;
use crate::error::DomainError;

/// PostgreSQL implementation of LocationRepository
pub struct PostgresLocationRepository {
    db: DatabaseConnection,
}

impl PostgresLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        let result = locations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, DomainError> {
        let result = locations::Entity::find()
            .filter(locations::Column::Latitude.eq(latitude))
            .filter(locations::Column::Longitude.eq(longitude))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, location: &NewLocation) -> Result<Location, DomainError> {
        let model = locations::ActiveModel {
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &LocationId,
        location: &NewLocation,
    ) -> Result<Location, DomainError> {
        let result = locations::ActiveModel {
            id: Set(id.0),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &LocationId) -> Result<(), DomainError> {
        locations::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<locations::Model> for Location {
    fn from(model: locations::Model) -> Self {
        Location {
            id: LocationId(model.id),
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
