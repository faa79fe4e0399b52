//! In-memory implementations of the repository port traits
//!
//! These store data in memory and allow tests to verify behavior without
//! a database. Ids are assigned from a per-repository counter; seeding
//! helpers (`with_*`) keep the counter ahead of the seeded ids.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Account, AccountFilter, AccountId, Animal, AnimalChanges, AnimalFilter, AnimalId, AnimalType,
    AnimalTypeId, LifeStatus, Location, LocationId, NewAccount, NewAnimal, NewAnimalType,
    NewLocation, VisitedLocation, VisitedLocationId,
};
use crate::domain::ports::{
    AccountRepository, AnimalRepository, AnimalTypeRepository, LocationRepository,
    VisitedLocationRepository,
};
use crate::error::DomainError;

fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ============================================================================
// In-Memory Account Repository
// ============================================================================

pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    next_id: AtomicI64,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::default(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-populate with an account for testing
    pub fn with_account(self, account: Account) -> Self {
        self.next_id
            .fetch_max(account.id.0 + 1, Ordering::SeqCst);
        self.accounts
            .write()
            .unwrap()
            .insert(account.id.0, account);
        self
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == email && a.password_hash == password_hash)
            .cloned())
    }

    async fn search(
        &self,
        filter: &AccountFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Account>, DomainError> {
        let mut results: Vec<Account> = self
            .accounts
            .read()
            .unwrap()
            .values()
            .filter(|a| {
                filter
                    .first_name
                    .as_ref()
                    .is_none_or(|v| icontains(&a.first_name, v))
                    && filter
                        .last_name
                        .as_ref()
                        .is_none_or(|v| icontains(&a.last_name, v))
                    && filter.email.as_ref().is_none_or(|v| icontains(&a.email, v))
            })
            .cloned()
            .collect();
        results.sort_by_key(|a| a.id.0);
        Ok(results
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create(&self, account: &NewAccount) -> Result<Account, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = Account {
            id: AccountId(id),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
        };
        self.accounts
            .write()
            .unwrap()
            .insert(id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: &AccountId, account: &NewAccount) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().unwrap();
        let stored = accounts
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Account {} not found", id)))?;
        stored.first_name = account.first_name.clone();
        stored.last_name = account.last_name.clone();
        stored.email = account.email.clone();
        stored.password_hash = account.password_hash.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        self.accounts.write().unwrap().remove(&id.0);
        Ok(())
    }
}

// ============================================================================
// In-Memory Location Repository
// ============================================================================

pub struct InMemoryLocationRepository {
    locations: Arc<RwLock<HashMap<i64, Location>>>,
    next_id: AtomicI64,
}

impl InMemoryLocationRepository {
    pub fn new() -> Self {
        Self {
            locations: Arc::default(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-populate with a location for testing
    pub fn with_location(self, location: Location) -> Self {
        self.next_id
            .fetch_max(location.id.0 + 1, Ordering::SeqCst);
        self.locations
            .write()
            .unwrap()
            .insert(location.id.0, location);
        self
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        Ok(self.locations.read().unwrap().get(&id.0).cloned())
    }

    async fn find_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, DomainError> {
        Ok(self
            .locations
            .read()
            .unwrap()
            .values()
            .find(|l| l.latitude == latitude && l.longitude == longitude)
            .cloned())
    }

    async fn create(&self, location: &NewLocation) -> Result<Location, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let location = Location {
            id: LocationId(id),
            latitude: location.latitude,
            longitude: location.longitude,
        };
        self.locations
            .write()
            .unwrap()
            .insert(id, location.clone());
        Ok(location)
    }

    async fn update(
        &self,
        id: &LocationId,
        location: &NewLocation,
    ) -> Result<Location, DomainError> {
        let mut locations = self.locations.write().unwrap();
        let stored = locations
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Location {} not found", id)))?;
        stored.latitude = location.latitude;
        stored.longitude = location.longitude;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &LocationId) -> Result<(), DomainError> {
        self.locations.write().unwrap().remove(&id.0);
        Ok(())
    }
}

// ============================================================================
// In-Memory Animal Type Repository
// ============================================================================

pub struct InMemoryAnimalTypeRepository {
    types: Arc<RwLock<HashMap<i64, AnimalType>>>,
    next_id: AtomicI64,
}

impl InMemoryAnimalTypeRepository {
    pub fn new() -> Self {
        Self {
            types: Arc::default(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-populate with an animal type for testing
    pub fn with_animal_type(self, animal_type: AnimalType) -> Self {
        self.next_id
            .fetch_max(animal_type.id.0 + 1, Ordering::SeqCst);
        self.types
            .write()
            .unwrap()
            .insert(animal_type.id.0, animal_type);
        self
    }
}

#[async_trait]
impl AnimalTypeRepository for InMemoryAnimalTypeRepository {
    async fn find_by_id(&self, id: &AnimalTypeId) -> Result<Option<AnimalType>, DomainError> {
        Ok(self.types.read().unwrap().get(&id.0).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AnimalType>, DomainError> {
        Ok(self
            .types
            .read()
            .unwrap()
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn create(&self, animal_type: &NewAnimalType) -> Result<AnimalType, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let animal_type = AnimalType {
            id: AnimalTypeId(id),
            name: animal_type.name.clone(),
        };
        self.types.write().unwrap().insert(id, animal_type.clone());
        Ok(animal_type)
    }

    async fn update(
        &self,
        id: &AnimalTypeId,
        animal_type: &NewAnimalType,
    ) -> Result<AnimalType, DomainError> {
        let mut types = self.types.write().unwrap();
        let stored = types
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Animal type {} not found", id)))?;
        stored.name = animal_type.name.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: &AnimalTypeId) -> Result<(), DomainError> {
        self.types.write().unwrap().remove(&id.0);
        Ok(())
    }
}

// ============================================================================
// In-Memory Animal Repository
// ============================================================================

pub struct InMemoryAnimalRepository {
    animals: Arc<RwLock<HashMap<i64, Animal>>>,
    next_id: AtomicI64,
}

impl InMemoryAnimalRepository {
    pub fn new() -> Self {
        Self {
            animals: Arc::default(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-populate with an animal for testing
    pub fn with_animal(self, animal: Animal) -> Self {
        self.insert_animal(animal);
        self
    }

    /// Insert an animal after construction (e.g. through an `Arc`)
    pub fn insert_animal(&self, animal: Animal) {
        self.next_id.fetch_max(animal.id.0 + 1, Ordering::SeqCst);
        self.animals.write().unwrap().insert(animal.id.0, animal);
    }

    pub(crate) fn animal_map(&self) -> Arc<RwLock<HashMap<i64, Animal>>> {
        self.animals.clone()
    }
}

#[async_trait]
impl AnimalRepository for InMemoryAnimalRepository {
    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, DomainError> {
        Ok(self.animals.read().unwrap().get(&id.0).cloned())
    }

    async fn search(
        &self,
        filter: &AnimalFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Animal>, DomainError> {
        let mut results: Vec<Animal> = self
            .animals
            .read()
            .unwrap()
            .values()
            .filter(|a| {
                filter
                    .chipped_after
                    .is_none_or(|start| a.chipping_datetime >= start)
                    && filter
                        .chipped_before
                        .is_none_or(|end| a.chipping_datetime <= end)
                    && filter.chipper_id.is_none_or(|id| a.chipper_id == id)
                    && filter
                        .chipping_location_id
                        .is_none_or(|id| a.chipping_location_id == id)
                    && filter.life_status.is_none_or(|s| a.life_status == s)
                    && filter.gender.is_none_or(|g| a.gender == g)
            })
            .cloned()
            .collect();
        results.sort_by_key(|a| a.id.0);
        Ok(results
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create(&self, animal: &NewAnimal) -> Result<Animal, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let animal = Animal {
            id: AnimalId(id),
            animal_types: animal.animal_types.clone(),
            weight: animal.weight,
            length: animal.length,
            height: animal.height,
            gender: animal.gender,
            life_status: LifeStatus::Alive,
            chipping_datetime: Utc::now(),
            chipper_id: animal.chipper_id,
            chipping_location_id: animal.chipping_location_id,
            visited_locations: vec![],
            death_datetime: None,
        };
        self.animals.write().unwrap().insert(id, animal.clone());
        Ok(animal)
    }

    async fn update(&self, id: &AnimalId, changes: &AnimalChanges) -> Result<Animal, DomainError> {
        let mut animals = self.animals.write().unwrap();
        let stored = animals
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", id)))?;
        stored.weight = changes.weight;
        stored.length = changes.length;
        stored.height = changes.height;
        stored.gender = changes.gender;
        stored.life_status = changes.life_status;
        stored.chipper_id = changes.chipper_id;
        stored.chipping_location_id = changes.chipping_location_id;
        stored.death_datetime = changes.death_datetime;
        Ok(stored.clone())
    }

    async fn set_types(
        &self,
        id: &AnimalId,
        types: &[AnimalTypeId],
    ) -> Result<Animal, DomainError> {
        let mut animals = self.animals.write().unwrap();
        let stored = animals
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", id)))?;
        stored.animal_types = types.to_vec();
        Ok(stored.clone())
    }

    async fn delete(&self, id: &AnimalId) -> Result<(), DomainError> {
        self.animals.write().unwrap().remove(&id.0);
        Ok(())
    }

    async fn exists_with_chipper(&self, account_id: &AccountId) -> Result<bool, DomainError> {
        Ok(self
            .animals
            .read()
            .unwrap()
            .values()
            .any(|a| a.chipper_id == *account_id))
    }

    async fn exists_with_chipping_location(
        &self,
        location_id: &LocationId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .animals
            .read()
            .unwrap()
            .values()
            .any(|a| a.chipping_location_id == *location_id))
    }

    async fn exists_with_type(&self, type_id: &AnimalTypeId) -> Result<bool, DomainError> {
        Ok(self
            .animals
            .read()
            .unwrap()
            .values()
            .any(|a| a.animal_types.contains(type_id)))
    }
}

// ============================================================================
// In-Memory Visited Location Repository
// ============================================================================

pub struct InMemoryVisitedLocationRepository {
    visits: Arc<RwLock<HashMap<i64, VisitedLocation>>>,
    /// Shared with the animal repository so mutations keep the animals'
    /// visit lists in step, like the real adapter's transaction does
    animals: Arc<RwLock<HashMap<i64, Animal>>>,
    next_id: AtomicI64,
}

impl InMemoryVisitedLocationRepository {
    /// Create a repository operating on the same animals as `animals`
    pub fn linked(animals: &InMemoryAnimalRepository) -> Self {
        Self {
            visits: Arc::default(),
            animals: animals.animal_map(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl VisitedLocationRepository for InMemoryVisitedLocationRepository {
    async fn find_by_id(
        &self,
        id: &VisitedLocationId,
    ) -> Result<Option<VisitedLocation>, DomainError> {
        Ok(self.visits.read().unwrap().get(&id.0).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[VisitedLocationId],
    ) -> Result<Vec<VisitedLocation>, DomainError> {
        let visits = self.visits.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| visits.get(&id.0).cloned())
            .collect())
    }

    async fn search(
        &self,
        ids: &[VisitedLocationId],
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VisitedLocation>, DomainError> {
        let visits = self.visits.read().unwrap();
        let mut results: Vec<VisitedLocation> = ids
            .iter()
            .filter_map(|id| visits.get(&id.0).cloned())
            .filter(|v| {
                start.is_none_or(|s| v.visit_datetime >= s)
                    && end.is_none_or(|e| v.visit_datetime <= e)
            })
            .collect();
        results.sort_by_key(|v| (v.visit_datetime, v.id.0));
        Ok(results
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn append(
        &self,
        animal_id: &AnimalId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError> {
        let mut animals = self.animals.write().unwrap();
        let animal = animals
            .get_mut(&animal_id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", animal_id)))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let visit = VisitedLocation {
            id: VisitedLocationId(id),
            visit_datetime: Utc::now(),
            location_id: *location_id,
        };
        self.visits.write().unwrap().insert(id, visit.clone());
        animal.visited_locations.push(visit.id);
        Ok(visit)
    }

    async fn remove(
        &self,
        animal_id: &AnimalId,
        ids: &[VisitedLocationId],
    ) -> Result<(), DomainError> {
        let mut animals = self.animals.write().unwrap();
        let animal = animals
            .get_mut(&animal_id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", animal_id)))?;

        animal.visited_locations.retain(|id| !ids.contains(id));
        let mut visits = self.visits.write().unwrap();
        for id in ids {
            visits.remove(&id.0);
        }
        Ok(())
    }

    async fn update_location(
        &self,
        id: &VisitedLocationId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError> {
        let mut visits = self.visits.write().unwrap();
        let stored = visits
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound(format!("Visited location {} not found", id)))?;
        stored.location_id = *location_id;
        Ok(stored.clone())
    }

    async fn exists_for_location(&self, location_id: &LocationId) -> Result<bool, DomainError> {
        Ok(self
            .visits
            .read()
            .unwrap()
            .values()
            .any(|v| v.location_id == *location_id))
    }
}
