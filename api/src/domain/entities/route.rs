//! An animal's movement route
//!
//! The ordered sequence of visited-location entries, with the chipping
//! location acting as an implicit position zero for adjacency checks.
//! All append/update/removal rules live here so the services stay thin
//! and the rules stay testable without I/O.

use thiserror::Error;

use crate::error::AppError;

use super::location::LocationId;
use super::visited_location::{VisitedLocation, VisitedLocationId};

/// A rule of the route was violated
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteViolation {
    #[error("visited location is not part of this animal's route")]
    NotOnRoute,

    #[error("location coincides with the chipping location")]
    AtChippingLocation,

    #[error("location repeats the previous stop")]
    RepeatsPreviousStop,

    #[error("location repeats the next stop")]
    RepeatsNextStop,

    #[error("location is unchanged")]
    Unchanged,
}

impl From<RouteViolation> for AppError {
    fn from(violation: RouteViolation) -> Self {
        match violation {
            RouteViolation::NotOnRoute => AppError::NotFound(violation.to_string()),
            _ => AppError::BadRequest(violation.to_string()),
        }
    }
}

/// Ordered visit history of one animal
///
/// Insertion order is chronology of movement. The first stop may never
/// repeat the chipping location, and no two adjacent stops may repeat
/// the same location.
#[derive(Debug, Clone)]
pub struct Route {
    chipping_location: LocationId,
    stops: Vec<VisitedLocation>,
}

impl Route {
    pub fn new(chipping_location: LocationId, stops: Vec<VisitedLocation>) -> Self {
        Self {
            chipping_location,
            stops,
        }
    }

    fn position(&self, entry: VisitedLocationId) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == entry)
    }

    /// Location of the head stop, if the route has one
    pub fn head_location(&self) -> Option<LocationId> {
        self.stops.first().map(|stop| stop.location_id)
    }

    /// Whether a new visit to `target` may be appended
    pub fn check_append(&self, target: LocationId) -> Result<(), RouteViolation> {
        match self.stops.last() {
            None if target == self.chipping_location => Err(RouteViolation::AtChippingLocation),
            Some(last) if last.location_id == target => Err(RouteViolation::RepeatsPreviousStop),
            _ => Ok(()),
        }
    }

    /// Whether `entry` may be repointed at `new_location`
    ///
    /// Checked in contract order: head-vs-chipping, no-op, next
    /// neighbour, previous neighbour.
    pub fn check_update(
        &self,
        entry: VisitedLocationId,
        new_location: LocationId,
    ) -> Result<(), RouteViolation> {
        let pos = self.position(entry).ok_or(RouteViolation::NotOnRoute)?;

        if pos == 0 && new_location == self.chipping_location {
            return Err(RouteViolation::AtChippingLocation);
        }
        if self.stops[pos].location_id == new_location {
            return Err(RouteViolation::Unchanged);
        }
        if let Some(next) = self.stops.get(pos + 1) {
            if next.location_id == new_location {
                return Err(RouteViolation::RepeatsNextStop);
            }
        }
        if pos > 0 && self.stops[pos - 1].location_id == new_location {
            return Err(RouteViolation::RepeatsPreviousStop);
        }
        Ok(())
    }

    /// Entry ids to delete when removing `entry`: the entry itself, plus
    /// the new head when the removal would leave it at the chipping
    /// location (cascade normalization). `None` when `entry` is not a
    /// member of the route.
    pub fn removal_plan(&self, entry: VisitedLocationId) -> Option<Vec<VisitedLocationId>> {
        let pos = self.position(entry)?;

        let mut doomed = vec![entry];
        if pos == 0 {
            if let Some(next) = self.stops.get(1) {
                if next.location_id == self.chipping_location {
                    doomed.push(next.id);
                }
            }
        }
        Some(doomed)
    }

    /// True when the animal is back where it was chipped, or never left
    pub fn returned_home(&self) -> bool {
        match self.stops.last() {
            None => true,
            Some(last) => last.location_id == self.chipping_location,
        }
    }
}
