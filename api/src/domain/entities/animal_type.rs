//! Animal type domain entity

use serde::{Deserialize, Serialize};

/// Unique identifier for an animal type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalTypeId(pub i64);

impl From<i64> for AnimalTypeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AnimalTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A classification animals are tagged with ("fox", "wolf", ...)
#[derive(Debug, Clone)]
pub struct AnimalType {
    pub id: AnimalTypeId,
    pub name: String,
}

/// Data needed to create or replace an animal type
#[derive(Debug, Clone)]
pub struct NewAnimalType {
    pub name: String,
}
