//! PostgreSQL adapter for AnimalRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{
    AccountId, Animal, AnimalChanges, AnimalFilter, AnimalId, AnimalTypeId, Gender, LifeStatus,
    LocationId, NewAnimal, VisitedLocationId,
};
use crate::domain::ports::AnimalRepository;
use crate::entity::{animals, visited_locations};
use crate::error::DomainError;

/// PostgreSQL implementation of AnimalRepository
pub struct PostgresAnimalRepository {
    db: DatabaseConnection,
}

impl PostgresAnimalRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnimalRepository for PostgresAnimalRepository {
    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, DomainError> {
        let result = animals::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn search(
        &self,
        filter: &AnimalFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Animal>, DomainError> {
        let mut query = animals::Entity::find();

        if let Some(start) = filter.chipped_after {
            query = query.filter(animals::Column::ChippingDatetime.gte(start));
        }
        if let Some(end) = filter.chipped_before {
            query = query.filter(animals::Column::ChippingDatetime.lte(end));
        }
        if let Some(chipper_id) = filter.chipper_id {
            query = query.filter(animals::Column::ChipperId.eq(chipper_id.0));
        }
        if let Some(location_id) = filter.chipping_location_id {
            query = query.filter(animals::Column::ChippingLocationId.eq(location_id.0));
        }
        if let Some(life_status) = filter.life_status {
            query = query.filter(animals::Column::LifeStatus.eq(life_status.to_string()));
        }
        if let Some(gender) = filter.gender {
            query = query.filter(animals::Column::Gender.eq(gender.to_string()));
        }

        let results = query
            .order_by_asc(animals::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, animal: &NewAnimal) -> Result<Animal, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = animals::ActiveModel {
            animal_types: Set(animal.animal_types.iter().map(|t| t.0).collect()),
            weight: Set(animal.weight),
            length: Set(animal.length),
            height: Set(animal.height),
            gender: Set(animal.gender.to_string()),
            life_status: Set(LifeStatus::Alive.to_string()),
            chipping_datetime: Set(now),
            chipper_id: Set(animal.chipper_id.0),
            chipping_location_id: Set(animal.chipping_location_id.0),
            visited_locations: Set(Vec::new()),
            death_datetime: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &AnimalId, changes: &AnimalChanges) -> Result<Animal, DomainError> {
        let result = animals::ActiveModel {
            id: Set(id.0),
            weight: Set(changes.weight),
            length: Set(changes.length),
            height: Set(changes.height),
            gender: Set(changes.gender.to_string()),
            life_status: Set(changes.life_status.to_string()),
            chipper_id: Set(changes.chipper_id.0),
            chipping_location_id: Set(changes.chipping_location_id.0),
            death_datetime: Set(changes.death_datetime.map(|dt| dt.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn set_types(
        &self,
        id: &AnimalId,
        types: &[AnimalTypeId],
    ) -> Result<Animal, DomainError> {
        let result = animals::ActiveModel {
            id: Set(id.0),
            animal_types: Set(types.iter().map(|t| t.0).collect()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &AnimalId) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let animal = animals::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Animal {} not found", id)))?;

        if !animal.visited_locations.is_empty() {
            visited_locations::Entity::delete_many()
                .filter(visited_locations::Column::Id.is_in(animal.visited_locations.clone()))
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        animals::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn exists_with_chipper(&self, account_id: &AccountId) -> Result<bool, DomainError> {
        let count = animals::Entity::find()
            .filter(animals::Column::ChipperId.eq(account_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn exists_with_chipping_location(
        &self,
        location_id: &LocationId,
    ) -> Result<bool, DomainError> {
        let count = animals::Entity::find()
            .filter(animals::Column::ChippingLocationId.eq(location_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn exists_with_type(&self, type_id: &AnimalTypeId) -> Result<bool, DomainError> {
        let count = animals::Entity::find()
            .filter(Expr::cust_with_values("? = ANY(animal_types)", [type_id.0]))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<animals::Model> for Animal {
    fn from(model: animals::Model) -> Self {
        Animal {
            id: AnimalId(model.id),
            animal_types: model.animal_types.into_iter().map(AnimalTypeId).collect(),
            weight: model.weight,
            length: model.length,
            height: model.height,
            gender: model.gender.parse().unwrap_or(Gender::Other),
            life_status: model.life_status.parse().unwrap_or(LifeStatus::Alive),
            chipping_datetime: model.chipping_datetime.with_timezone(&Utc),
            chipper_id: AccountId(model.chipper_id),
            chipping_location_id: LocationId(model.chipping_location_id),
            visited_locations: model
                .visited_locations
                .into_iter()
                .map(VisitedLocationId)
                .collect(),
            death_datetime: model.death_datetime.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
