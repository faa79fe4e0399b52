//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;

use crate::domain::entities::{
    Account, AccountId, Animal, AnimalId, AnimalType, AnimalTypeId, Gender, LifeStatus, Location,
    LocationId,
};

/// Create a test account with default values
pub fn test_account(id: i64, email: &str) -> Account {
    Account {
        id: AccountId(id),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password_hash: "abc123hash".to_string(),
    }
}

/// Create a test location at the given coordinates
pub fn test_location(id: i64, latitude: f64, longitude: f64) -> Location {
    Location {
        id: LocationId(id),
        latitude,
        longitude,
    }
}

/// Create a test animal type
pub fn test_animal_type(id: i64, name: &str) -> AnimalType {
    AnimalType {
        id: AnimalTypeId(id),
        name: name.to_string(),
    }
}

/// Create an alive test animal with one type and an empty route
pub fn test_animal(id: i64, chipping_location_id: i64) -> Animal {
    Animal {
        id: AnimalId(id),
        animal_types: vec![AnimalTypeId(1)],
        weight: 4.2,
        length: 0.9,
        height: 0.4,
        gender: Gender::Female,
        life_status: LifeStatus::Alive,
        chipping_datetime: Utc::now(),
        chipper_id: AccountId(1),
        chipping_location_id: LocationId(chipping_location_id),
        visited_locations: vec![],
        death_datetime: None,
    }
}
