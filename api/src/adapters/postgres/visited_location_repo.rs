//! PostgreSQL adapter for VisitedLocationRepository
//!
//! The invariants of a route span two records: the ledger row and the
//! owning animal's `visited_locations` array. `append` and `remove`
//! therefore run inside a transaction that locks the animal row first,
//! so concurrent mutations of the same route serialize instead of losing
//! updates.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{AnimalId, LocationId, VisitedLocation, VisitedLocationId};
use crate::domain::ports::VisitedLocationRepository;
use crate::entity::{animals, visited_locations};
use crate::error::DomainError;

/// PostgreSQL implementation of VisitedLocationRepository
pub struct PostgresVisitedLocationRepository {
    db: DatabaseConnection,
}

impl PostgresVisitedLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VisitedLocationRepository for PostgresVisitedLocationRepository {
    async fn find_by_id(
        &self,
        id: &VisitedLocationId,
    ) -> Result<Option<VisitedLocation>, DomainError> {
        let result = visited_locations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_ids(
        &self,
        ids: &[VisitedLocationId],
    ) -> Result<Vec<VisitedLocation>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = visited_locations::Entity::find()
            .filter(visited_locations::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // Hand the rows back in route order, not table order
        let mut by_id: HashMap<i64, visited_locations::Model> =
            models.into_iter().map(|m| (m.id, m)).collect();

        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(&id.0))
            .map(|m| m.into())
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
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = visited_locations::Entity::find()
            .filter(visited_locations::Column::Id.is_in(ids.iter().map(|id| id.0)));

        if let Some(start) = start {
            query = query.filter(visited_locations::Column::VisitDatetime.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(visited_locations::Column::VisitDatetime.lte(end));
        }

        let results = query
            .order_by_asc(visited_locations::Column::VisitDatetime)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn append(
        &self,
        animal_id: &AnimalId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let animal = animals::Entity::find_by_id(animal_id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", animal_id)))?;

        let entry = visited_locations::ActiveModel {
            visit_datetime: Set(Utc::now().fixed_offset()),
            location_id: Set(location_id.0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut route = animal.visited_locations.clone();
        route.push(entry.id);

        animals::ActiveModel {
            id: Set(animal.id),
            visited_locations: Set(route),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(entry.into())
    }

    async fn remove(
        &self,
        animal_id: &AnimalId,
        ids: &[VisitedLocationId],
    ) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let animal = animals::Entity::find_by_id(animal_id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", animal_id)))?;

        let doomed: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let route: Vec<i64> = animal
            .visited_locations
            .iter()
            .copied()
            .filter(|id| !doomed.contains(id))
            .collect();

        animals::ActiveModel {
            id: Set(animal.id),
            visited_locations: Set(route),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        visited_locations::Entity::delete_many()
            .filter(visited_locations::Column::Id.is_in(doomed))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update_location(
        &self,
        id: &VisitedLocationId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, DomainError> {
        let result = visited_locations::ActiveModel {
            id: Set(id.0),
            location_id: Set(location_id.0),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn exists_for_location(&self, location_id: &LocationId) -> Result<bool, DomainError> {
        let count = visited_locations::Entity::find()
            .filter(visited_locations::Column::LocationId.eq(location_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<visited_locations::Model> for VisitedLocation {
    fn from(model: visited_locations::Model) -> Self {
        VisitedLocation {
            id: VisitedLocationId(model.id),
            visit_datetime: model.visit_datetime.with_timezone(&Utc),
            location_id: LocationId(model.location_id),
        }
    }
}
