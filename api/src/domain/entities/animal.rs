//! Animal domain entity
//!
//! A chipped animal: its classification, physical attributes, life status,
//! chipping point and the ordered ids of its visited-location entries.
//! The visit list itself is only ever mutated through the visit service;
//! the ordering rules live in [`super::route::Route`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::animal_type::AnimalTypeId;
use super::location::LocationId;
use super::visited_location::VisitedLocationId;

/// Unique identifier for an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub i64);

impl From<i64> for AnimalId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AnimalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Animal gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Life status; the only allowed transition is ALIVE -> DEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifeStatus {
    Alive,
    Dead,
}

impl std::fmt::Display for LifeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifeStatus::Alive => write!(f, "ALIVE"),
            LifeStatus::Dead => write!(f, "DEAD"),
        }
    }
}

impl std::str::FromStr for LifeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALIVE" => Ok(LifeStatus::Alive),
            "DEAD" => Ok(LifeStatus::Dead),
            _ => Err(format!("Unknown life status: {}", s)),
        }
    }
}

/// A chipped animal
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: AnimalId,
    /// Ordered, duplicate-free list of type references; never empty
    pub animal_types: Vec<AnimalTypeId>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub life_status: LifeStatus,
    /// Set once at registration; immutable afterwards
    pub chipping_datetime: DateTime<Utc>,
    pub chipper_id: AccountId,
    pub chipping_location_id: LocationId,
    /// Ordered ids of the animal's ledger entries (the route)
    pub visited_locations: Vec<VisitedLocationId>,
    /// Stamped when the animal transitions to DEAD, fixed afterwards
    pub death_datetime: Option<DateTime<Utc>>,
}

impl Animal {
    pub fn is_dead(&self) -> bool {
        self.life_status == LifeStatus::Dead
    }

    pub fn has_type(&self, type_id: &AnimalTypeId) -> bool {
        self.animal_types.contains(type_id)
    }
}

/// Data needed to register a new animal
#[derive(Debug, Clone)]
pub struct NewAnimal {
    pub animal_types: Vec<AnimalTypeId>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub chipper_id: AccountId,
    pub chipping_location_id: LocationId,
}

/// Replacement data for an animal update; the service resolves the
/// life-status transition into `death_datetime` before persisting
#[derive(Debug, Clone)]
pub struct AnimalChanges {
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub life_status: LifeStatus,
    pub chipper_id: AccountId,
    pub chipping_location_id: LocationId,
    pub death_datetime: Option<DateTime<Utc>>,
}

/// Filters for animal search; the timestamp bounds apply to the
/// chipping datetime, inclusively
#[derive(Debug, Clone, Default)]
pub struct AnimalFilter {
    pub chipped_after: Option<DateTime<Utc>>,
    pub chipped_before: Option<DateTime<Utc>>,
    pub chipper_id: Option<AccountId>,
    pub chipping_location_id: Option<LocationId>,
    pub life_status: Option<LifeStatus>,
    pub gender: Option<Gender>,
}
