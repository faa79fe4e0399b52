//! PostgreSQL adapter for AnimalTypeRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::entities::{AnimalType, AnimalTypeId, NewAnimalType};
use crate::domain::ports::AnimalTypeRepository;
use crate::entity::animal_types;
use crate::error::DomainError;

/// PostgreSQL implementation of AnimalTypeRepository
pub struct PostgresAnimalTypeRepository {
    db: DatabaseConnection,
}

impl PostgresAnimalTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnimalTypeRepository for PostgresAnimalTypeRepository {
    async fn find_by_id(&self, id: &AnimalTypeId) -> Result<Option<AnimalType>, DomainError> {
        let result = animal_types::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AnimalType>, DomainError> {
        let result = animal_types::Entity::find()
            .filter(animal_types::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, animal_type: &NewAnimalType) -> Result<AnimalType, DomainError> {
        let model = animal_types::ActiveModel {
            name: Set(animal_type.name.clone()),
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
        id: &AnimalTypeId,
        animal_type: &NewAnimalType,
    ) -> Result<AnimalType, DomainError> {
        let result = animal_types::ActiveModel {
            id: Set(id.0),
            name: Set(animal_type.name.clone()),
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &AnimalTypeId) -> Result<(), DomainError> {
        animal_types::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<animal_types::Model> for AnimalType {
    fn from(model: animal_types::Model) -> Self {
        AnimalType {
            id: AnimalTypeId(model.id),
            name: model.name,
        }
    }
}
