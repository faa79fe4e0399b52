//! Animal service
//!
//! Registration, search and lifecycle of animals, including the points
//! where the lifecycle meets the visit ledger: the one-way ALIVE -> DEAD
//! transition, the chipping-location-vs-route-head rule on update, and
//! the returned-home precondition on delete.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{
    Animal, AnimalChanges, AnimalFilter, AnimalId, AnimalTypeId, Gender, LifeStatus, NewAnimal,
    Route,
};
use crate::domain::ports::{
    AccountRepository, AnimalRepository, AnimalTypeRepository, LocationRepository,
    VisitedLocationRepository,
};
use crate::error::{AppError, DomainError};

/// Replacement payload for an animal update
#[derive(Debug, Clone)]
pub struct AnimalData {
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub life_status: LifeStatus,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
}

/// Service for managing animals
pub struct AnimalService<NR, TR, CR, LR, VR>
where
    NR: AnimalRepository,
    TR: AnimalTypeRepository,
    CR: AccountRepository,
    LR: LocationRepository,
    VR: VisitedLocationRepository,
{
    animals: Arc<NR>,
    types: Arc<TR>,
    accounts: Arc<CR>,
    locations: Arc<LR>,
    visits: Arc<VR>,
}

impl<NR, TR, CR, LR, VR> AnimalService<NR, TR, CR, LR, VR>
where
    NR: AnimalRepository,
    TR: AnimalTypeRepository,
    CR: AccountRepository,
    LR: LocationRepository,
    VR: VisitedLocationRepository,
{
    pub fn new(
        animals: Arc<NR>,
        types: Arc<TR>,
        accounts: Arc<CR>,
        locations: Arc<LR>,
        visits: Arc<VR>,
    ) -> Self {
        Self {
            animals,
            types,
            accounts,
            locations,
            visits,
        }
    }

    async fn route_of(&self, animal: &Animal) -> Result<Route, AppError> {
        let stops = self.visits.find_by_ids(&animal.visited_locations).await?;
        Ok(Route::new(animal.chipping_location_id, stops))
    }

    /// Register a new animal
    pub async fn create(&self, data: &NewAnimal) -> Result<Animal, AppError> {
        validate_measurements(data.weight, data.length, data.height)?;

        if data.animal_types.is_empty() {
            return Err(AppError::BadRequest(
                "animalTypes must not be empty".to_string(),
            ));
        }
        if data.animal_types.iter().any(|t| t.0 <= 0)
            || data.chipper_id.0 <= 0
            || data.chipping_location_id.0 <= 0
        {
            return Err(AppError::BadRequest(
                "all referenced ids must be positive".to_string(),
            ));
        }

        let unique: HashSet<&AnimalTypeId> = data.animal_types.iter().collect();
        if unique.len() != data.animal_types.len() {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "animalTypes contains duplicates".to_string(),
            )));
        }

        for type_id in &data.animal_types {
            self.types
                .find_by_id(type_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", type_id)))?;
        }

        self.accounts
            .find_by_id(&data.chipper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", data.chipper_id)))?;

        self.locations
            .find_by_id(&data.chipping_location_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Location {} not found", data.chipping_location_id))
            })?;

        Ok(self.animals.create(data).await?)
    }

    /// Find an animal by ID
    pub async fn get(&self, id: &AnimalId) -> Result<Option<Animal>, AppError> {
        Ok(self.animals.find_by_id(id).await?)
    }

    /// Filtered search ordered by id
    pub async fn search(
        &self,
        filter: &AnimalFilter,
        from: i64,
        size: i64,
    ) -> Result<Vec<Animal>, AppError> {
        if filter.chipper_id.is_some_and(|id| id.0 <= 0)
            || filter.chipping_location_id.is_some_and(|id| id.0 <= 0)
        {
            return Err(AppError::BadRequest(
                "chipperId and chippingLocationId must be positive".to_string(),
            ));
        }

        Ok(self.animals.search(filter, from, size).await?)
    }

    /// Replace an animal's mutable attributes
    pub async fn update(&self, id: &AnimalId, data: &AnimalData) -> Result<Animal, AppError> {
        validate_measurements(data.weight, data.length, data.height)?;

        if data.chipper_id <= 0 || data.chipping_location_id <= 0 {
            return Err(AppError::BadRequest(
                "chipperId and chippingLocationId must be positive".to_string(),
            ));
        }

        let animal = self
            .animals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", id)))?;

        if animal.is_dead() && data.life_status == LifeStatus::Alive {
            return Err(AppError::BadRequest(
                "a dead animal cannot be returned to life".to_string(),
            ));
        }

        let chipper_id = data.chipper_id.into();
        let chipping_location_id = data.chipping_location_id.into();

        self.accounts
            .find_by_id(&chipper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", chipper_id)))?;

        self.locations
            .find_by_id(&chipping_location_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Location {} not found", chipping_location_id))
            })?;

        // Mirror of the route's head rule, seen from the animal's side
        let route = self.route_of(&animal).await?;
        if route.head_location() == Some(chipping_location_id) {
            return Err(AppError::BadRequest(
                "chipping location matches the first visited location".to_string(),
            ));
        }

        let death_datetime = match (animal.life_status, data.life_status) {
            (LifeStatus::Alive, LifeStatus::Dead) => Some(Utc::now()),
            _ => animal.death_datetime,
        };

        let changes = AnimalChanges {
            weight: data.weight,
            length: data.length,
            height: data.height,
            gender: data.gender,
            life_status: data.life_status,
            chipper_id,
            chipping_location_id,
            death_datetime,
        };

        Ok(self.animals.update(id, &changes).await?)
    }

    /// Delete an animal; it must have returned to its chipping location
    pub async fn delete(&self, id: &AnimalId) -> Result<(), AppError> {
        let animal = self
            .animals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", id)))?;

        let route = self.route_of(&animal).await?;
        if !route.returned_home() {
            return Err(AppError::BadRequest(
                "animal has not returned to its chipping location".to_string(),
            ));
        }

        Ok(self.animals.delete(id).await?)
    }

    /// Tag an animal with an additional type
    pub async fn add_type(
        &self,
        animal_id: &AnimalId,
        type_id: &AnimalTypeId,
    ) -> Result<Animal, AppError> {
        let animal = self
            .animals
            .find_by_id(animal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", animal_id)))?;

        self.types
            .find_by_id(type_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", type_id)))?;

        if animal.has_type(type_id) {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Animal {} already has type {}",
                animal_id, type_id
            ))));
        }

        let mut types = animal.animal_types.clone();
        types.push(*type_id);

        Ok(self.animals.set_types(animal_id, &types).await?)
    }

    /// Replace one of an animal's types with another, keeping its position
    pub async fn update_type(
        &self,
        animal_id: &AnimalId,
        old_type_id: &AnimalTypeId,
        new_type_id: &AnimalTypeId,
    ) -> Result<Animal, AppError> {
        let animal = self
            .animals
            .find_by_id(animal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", animal_id)))?;

        self.types
            .find_by_id(new_type_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", new_type_id)))?;

        self.types
            .find_by_id(old_type_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", old_type_id)))?;

        if !animal.has_type(old_type_id) {
            return Err(AppError::NotFound(format!(
                "Animal {} does not have type {}",
                animal_id, old_type_id
            )));
        }
        if animal.has_type(new_type_id) {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Animal {} already has type {}",
                animal_id, new_type_id
            ))));
        }

        let types: Vec<AnimalTypeId> = animal
            .animal_types
            .iter()
            .map(|t| if t == old_type_id { *new_type_id } else { *t })
            .collect();

        Ok(self.animals.set_types(animal_id, &types).await?)
    }

    /// Untag a type from an animal; the last type may not be removed
    pub async fn remove_type(
        &self,
        animal_id: &AnimalId,
        type_id: &AnimalTypeId,
    ) -> Result<Animal, AppError> {
        let animal = self
            .animals
            .find_by_id(animal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", animal_id)))?;

        self.types
            .find_by_id(type_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal type {} not found", type_id)))?;

        if !animal.has_type(type_id) {
            return Err(AppError::NotFound(format!(
                "Animal {} does not have type {}",
                animal_id, type_id
            )));
        }
        if animal.animal_types.len() == 1 {
            return Err(AppError::BadRequest(
                "an animal must keep at least one type".to_string(),
            ));
        }

        let types: Vec<AnimalTypeId> = animal
            .animal_types
            .iter()
            .copied()
            .filter(|t| t != type_id)
            .collect();

        Ok(self.animals.set_types(animal_id, &types).await?)
    }
}

fn validate_measurements(weight: f64, length: f64, height: f64) -> Result<(), AppError> {
    if weight <= 0.0 || length <= 0.0 || height <= 0.0 {
        return Err(AppError::BadRequest(
            "weight, length and height must be positive".to_string(),
        ));
    }
    Ok(())
}
