//! Animal type service

use std::sync::Arc;

use crate::domain::entities::{AnimalType, AnimalTypeId, NewAnimalType};
use crate::domain::ports::{AnimalRepository, AnimalTypeRepository};
use crate::error::{AppError, DomainError};

/// Service for managing animal types
pub struct AnimalTypeService<TR, NR>
where
    TR: AnimalTypeRepository,
    NR: AnimalRepository,
{
    types: Arc<TR>,
    animals: Arc<NR>,
}

impl<TR, NR> AnimalTypeService<TR, NR>
where
    TR: AnimalTypeRepository,
    NR: AnimalRepository,
{
    pub fn new(types: Arc<TR>, animals: Arc<NR>) -> Self {
        Self { types, animals }
    }

    /// Create a new animal type
    pub async fn create(&self, name: &str) -> Result<AnimalType, AppError> {
        let name = validate(name)?;

        if self.types.find_by_name(&name).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Animal type '{}' already exists",
                name
            ))));
        }

        Ok(self.types.create(&NewAnimalType { name }).await?)
    }

    /// Find an animal type by ID
    pub async fn get(&self, id: &AnimalTypeId) -> Result<Option<AnimalType>, AppError> {
        Ok(self.types.find_by_id(id).await?)
    }

    /// Replace an animal type's value
    pub async fn update(&self, id: &AnimalTypeId, name: &str) -> Result<AnimalType, AppError> {
        let name = validate(name)?;

        self.types
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", id)))?;

        if let Some(taken) = self.types.find_by_name(&name).await? {
            if taken.id != *id {
                return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                    "Animal type '{}' already exists",
                    name
                ))));
            }
        }

        Ok(self.types.update(id, &NewAnimalType { name }).await?)
    }

    /// Delete an animal type; rejected while any animal carries it
    pub async fn delete(&self, id: &AnimalTypeId) -> Result<(), AppError> {
        self.types
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", id)))?;

        if self.animals.exists_with_type(id).await? {
            return Err(AppError::BadRequest(
                "animals with this type still exist".to_string(),
            ));
        }

        Ok(self.types.delete(id).await?)
    }
}

fn validate(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("type must not be blank".to_string()));
    }
    Ok(name.to_string())
}
