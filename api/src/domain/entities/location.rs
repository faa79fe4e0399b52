//! Location domain entity
//!
//! A geographic point animals are chipped at and travel between.

use serde::{Deserialize, Serialize};

/// Unique identifier for a location point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub i64);

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic point
#[derive(Debug, Clone)]
pub struct Location {
    pub id: LocationId,
    pub latitude: f64,
    pub longitude: f64,
}

/// Data needed to create or replace a location
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl NewLocation {
    /// Whether the coordinates fall within the valid WGS84 ranges
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}
