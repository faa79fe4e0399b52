//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Account, AccountFilter, AccountId, Animal, AnimalChanges, AnimalFilter, AnimalId, AnimalType,
    AnimalTypeId, Location, LocationId, NewAccount, NewAnimal, NewAnimalType, NewLocation,
    VisitedLocation, VisitedLocationId,
};
use crate::error::DomainError;

/// Repository for Account entities
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Find an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by email and password digest
    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Case-insensitive substring search, ordered by id
    async fn search(
        &self,
        filter: &AccountFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Account>, DomainError>;

    /// Create a new account
    async fn create(&self, account: &NewAccount) -> Result<Account, DomainError>;

    /// Replace an account's data
    async fn update(&self, id: &AccountId, account: &NewAccount) -> Result<Account, DomainError>;

    /// Delete an account
    async fn delete(&self, id: &AccountId) -> Result<(), DomainError>;
}

/// Repository for Location entities
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Find a location by ID
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError>;

    /// Find a location by its exact coordinate pair
    async fn find_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, DomainError>;

    /// Create a new location
    async fn create(&self, location: &NewLocation) -> Result<Location, DomainError>;

    /// Replace a location's coordinates
    async fn update(&self, id: &LocationId, location: &NewLocation)
        -> Result<Location, DomainError>;

    /// Delete a location
    async fn delete(&self, id: &LocationId) -> Result<(), DomainError>;
}

/// Repository for AnimalType entities
#[async_trait]
pub trait AnimalTypeRepository: Send + Sync {
    /// Find an animal type by ID
    async fn find_by_id(&self, id: &AnimalTypeId) -> Result<Option<AnimalType>, DomainError>;

    /// Find an animal type by its exact value
    async fn find_by_name(&self, name: &str) -> Result<Option<AnimalType>, DomainError>;

    /// Create a new animal type
    async fn create(&self, animal_type: &NewAnimalType) -> Result<AnimalType, DomainError>;

    /// Replace an animal type's value
    async fn update(
        &self,
        id: &AnimalTypeId,
        animal_type: &NewAnimalType,
    ) -> Result<AnimalType, DomainError>;

    /// Delete an animal type
    async fn delete(&self, id: &AnimalTypeId) -> Result<(), DomainError>;
}

/// Repository for Animal entities
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// Find an animal by ID
    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, DomainError>;

    /// Filtered search ordered by id
    async fn search(
        &self,
        filter: &AnimalFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Animal>, DomainError>;

    /// Register a new animal (ALIVE, chipped now, empty route)
    async fn create(&self, animal: &NewAnimal) -> Result<Animal, DomainError>;

    /// Replace an animal's mutable attributes
    async fn update(&self, id: &AnimalId, changes: &AnimalChanges) -> Result<Animal, DomainError>;

    /// Replace the animal's type list, preserving the given order
    async fn set_types(
        &self,
        id: &AnimalId,
        types: &[AnimalTypeId],
    ) -> Result<Animal, DomainError>;

    /// Delete the animal together with its ledger entries
    async fn delete(&self, id: &AnimalId) -> Result<(), DomainError>;

    /// Whether any animal references the account as its chipper
    async fn exists_with_chipper(&self, account_id: &AccountId) -> Result<bool, DomainError>;

    /// Whether any animal is chipped at the location
    async fn exists_with_chipping_location(
        &self,
        location_id: &LocationId,
    ) -> Result<bool, DomainError>;

    /// Whether any animal carries the type
    async fn exists_with_type(&self, type_id: &AnimalTypeId) -> Result<bool, DomainError>;
}

/// Repository for VisitedLocation ledger entries
///
/// The mutating operations keep the ledger table and the owning animal's
/// visit list consistent: each runs as one transaction holding a row lock
/// on the animal, so concurrent mutations of the same route serialize.
#[async_trait]
pub trait VisitedLocationRepository: Send + Sync {
    /// Find a ledger entry by ID
    async fn find_by_id(&self, id: &VisitedLocationId)
        -> Result<Option<VisitedLocation>, DomainError>;

    /// Fetch entries by id, returned in the order the ids are given
    async fn find_by_ids(
        &self,
        ids: &[VisitedLocationId],
    ) -> Result<Vec<VisitedLocation>, DomainError>;

    /// Membership-filtered page, bounded by inclusive visit-time limits,
    /// ordered by visit time ascending
    async fn search(
        &self,
        ids: &[VisitedLocationId],
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VisitedLocation>, DomainError>;

    /// Create an entry stamped with the current time and append it to the
    /// animal's visit list
    async fn append(
        &self,
        animal_id: &AnimalId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError>;

    /// Drop the given entries from the animal's visit list and delete them
    async fn remove(
        &self,
        animal_id: &AnimalId,
        ids: &[VisitedLocationId],
    ) -> Result<(), DomainError>;

    /// Repoint an entry at a new location, visit timestamp unchanged
    async fn update_location(
        &self,
        id: &VisitedLocationId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError>;

    /// Whether any ledger entry references the location
    async fn exists_for_location(&self, location_id: &LocationId) -> Result<bool, DomainError>;
}
