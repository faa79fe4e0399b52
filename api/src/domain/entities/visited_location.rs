//! Visited location domain entity
//!
//! One timestamped ledger entry recording that an animal occupied a
//! location. Entries belong to exactly one animal's route and are only
//! ever created or deleted through the visit service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::LocationId;

/// Unique identifier for a visited-location ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitedLocationId(pub i64);

impl From<i64> for VisitedLocationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VisitedLocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timestamped record of an animal occupying a location
#[derive(Debug, Clone)]
pub struct VisitedLocation {
    pub id: VisitedLocationId,
    pub visit_datetime: DateTime<Utc>,
    pub location_id: LocationId,
}
