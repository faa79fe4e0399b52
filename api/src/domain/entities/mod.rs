//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod account;
pub mod animal;
pub mod animal_type;
pub mod location;
pub mod route;
pub mod visited_location;

pub use account::{Account, AccountFilter, AccountId, NewAccount};
pub use animal::{
    Animal, AnimalChanges, AnimalFilter, AnimalId, Gender, LifeStatus, NewAnimal,
};
pub use animal_type::{AnimalType, AnimalTypeId, NewAnimalType};
pub use location::{Location, LocationId, NewLocation};
pub use route::{Route, RouteViolation};
pub use visited_location::{VisitedLocation, VisitedLocationId};
