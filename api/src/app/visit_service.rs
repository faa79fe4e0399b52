//! Visit ledger service
//!
//! Manager of an animal's ordered visit history. Preconditions are
//! checked in contract order - the first failure wins - and every
//! mutation is handed to the repository as one atomic unit, so the
//! ledger table and the animal's visit list never drift apart.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Animal, AnimalId, LocationId, Route, VisitedLocation, VisitedLocationId,
};
use crate::domain::ports::{AnimalRepository, LocationRepository, VisitedLocationRepository};
use crate::error::AppError;

/// Page of an animal's history, bounded by inclusive visit-time limits
#[derive(Debug, Clone)]
pub struct VisitQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub from: i64,
    pub size: i64,
}

/// Service for managing visited-location ledger entries
pub struct VisitService<NR, LR, VR>
where
    NR: AnimalRepository,
    LR: LocationRepository,
    VR: VisitedLocationRepository,
{
    animals: Arc<NR>,
    locations: Arc<LR>,
    visits: Arc<VR>,
}

impl<NR, LR, VR> VisitService<NR, LR, VR>
where
    NR: AnimalRepository,
    LR: LocationRepository,
    VR: VisitedLocationRepository,
{
    pub fn new(animals: Arc<NR>, locations: Arc<LR>, visits: Arc<VR>) -> Self {
        Self {
            animals,
            locations,
            visits,
        }
    }

    async fn find_animal(&self, id: &AnimalId) -> Result<Animal, AppError> {
        self.animals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Animal {} not found", id)))
    }

    async fn route_of(&self, animal: &Animal) -> Result<Route, AppError> {
        let stops = self.visits.find_by_ids(&animal.visited_locations).await?;
        Ok(Route::new(animal.chipping_location_id, stops))
    }

    /// Page through an animal's history, ordered by visit time
    ///
    /// An empty route short-circuits to an empty page; the bounds never
    /// matter. Otherwise only entries that are members of this animal's
    /// route are considered - the ledger table also holds everyone
    /// else's entries.
    pub async fn list(
        &self,
        animal_id: &AnimalId,
        query: &VisitQuery,
    ) -> Result<Vec<VisitedLocation>, AppError> {
        let animal = self.find_animal(animal_id).await?;

        if animal.visited_locations.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .visits
            .search(
                &animal.visited_locations,
                query.start,
                query.end,
                query.from,
                query.size,
            )
            .await?)
    }

    /// Record a new visit at the end of the animal's route
    pub async fn append(
        &self,
        animal_id: &AnimalId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, AppError> {
        let animal = self.find_animal(animal_id).await?;

        let location = self
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", location_id)))?;

        if animal.is_dead() {
            return Err(AppError::BadRequest(
                "a dead animal cannot visit new locations".to_string(),
            ));
        }

        let route = self.route_of(&animal).await?;
        route.check_append(location.id)?;

        Ok(self.visits.append(&animal.id, &location.id).await?)
    }

    /// Repoint an existing entry at a new location
    pub async fn update(
        &self,
        animal_id: &AnimalId,
        entry_id: &VisitedLocationId,
        location_id: &LocationId,
    ) -> Result<VisitedLocation, AppError> {
        let animal = self.find_animal(animal_id).await?;

        if !animal.visited_locations.contains(entry_id) {
            return Err(AppError::NotFound(format!(
                "Visited location {} is not part of animal {}'s route",
                entry_id, animal_id
            )));
        }

        let location = self
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", location_id)))?;

        // Membership was checked above; a miss here means the list and
        // the ledger table have drifted apart
        self.visits
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visited location {} not found", entry_id)))?;

        let route = self.route_of(&animal).await?;
        route.check_update(*entry_id, location.id)?;

        Ok(self.visits.update_location(entry_id, &location.id).await?)
    }

    /// Delete an entry from the animal's route
    ///
    /// When the removal would leave the new head at the chipping
    /// location, that head is removed as well (cascade normalization).
    pub async fn remove(
        &self,
        animal_id: &AnimalId,
        entry_id: &VisitedLocationId,
    ) -> Result<(), AppError> {
        let animal = self.find_animal(animal_id).await?;

        self.visits
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visited location {} not found", entry_id)))?;

        let route = self.route_of(&animal).await?;
        let doomed = route.removal_plan(*entry_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Visited location {} is not part of animal {}'s route",
                entry_id, animal_id
            ))
        })?;

        Ok(self.visits.remove(&animal.id, &doomed).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LifeStatus;
    use crate::test_utils::{
        test_animal, test_location, InMemoryAnimalRepository, InMemoryLocationRepository,
        InMemoryVisitedLocationRepository,
    };

    type Service = VisitService<
        InMemoryAnimalRepository,
        InMemoryLocationRepository,
        InMemoryVisitedLocationRepository,
    >;

    struct Harness {
        animals: Arc<InMemoryAnimalRepository>,
        visits: Arc<InMemoryVisitedLocationRepository>,
        service: Service,
    }

    /// One alive animal (id 1) chipped at location 1; locations 1-4 exist
    fn harness() -> Harness {
        harness_with(test_animal(1, 1))
    }

    fn harness_with(animal: crate::domain::entities::Animal) -> Harness {
        let animals = InMemoryAnimalRepository::new().with_animal(animal);
        let visits = InMemoryVisitedLocationRepository::linked(&animals);
        let animals = Arc::new(animals);
        let visits = Arc::new(visits);
        let locations = Arc::new(
            InMemoryLocationRepository::new()
                .with_location(test_location(1, 0.0, 0.0))
                .with_location(test_location(2, 1.0, 1.0))
                .with_location(test_location(3, 2.0, 2.0))
                .with_location(test_location(4, 3.0, 3.0)),
        );
        let service = VisitService::new(animals.clone(), locations, visits.clone());
        Harness {
            animals,
            visits,
            service,
        }
    }

    fn unbounded() -> VisitQuery {
        VisitQuery {
            start: None,
            end: None,
            from: 0,
            size: 10,
        }
    }

    async fn route_ids(h: &Harness) -> Vec<i64> {
        h.animals
            .find_by_id(&AnimalId(1))
            .await
            .unwrap()
            .unwrap()
            .visited_locations
            .iter()
            .map(|id| id.0)
            .collect()
    }

    #[tokio::test]
    async fn append_to_missing_animal_is_not_found() {
        let h = harness();

        let result = h.service.append(&AnimalId(9), &LocationId(2)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn append_to_missing_location_is_not_found() {
        let h = harness();

        let result = h.service.append(&AnimalId(1), &LocationId(9)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn append_to_dead_animal_is_rejected() {
        let mut animal = test_animal(1, 1);
        animal.life_status = LifeStatus::Dead;
        let h = harness_with(animal);

        let result = h.service.append(&AnimalId(1), &LocationId(2)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn first_visit_may_not_be_the_chipping_location() {
        let h = harness();

        let result = h.service.append(&AnimalId(1), &LocationId(1)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn append_success_grows_the_route() {
        let h = harness();

        let entry = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        assert_eq!(entry.location_id, LocationId(2));
        assert_eq!(route_ids(&h).await, vec![entry.id.0]);
    }

    #[tokio::test]
    async fn append_may_not_repeat_the_last_stop() {
        let h = harness();
        h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        let result = h.service.append(&AnimalId(1), &LocationId(2)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn append_back_to_chipping_location_is_allowed_mid_route() {
        let h = harness();
        h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        let entry = h.service.append(&AnimalId(1), &LocationId(1)).await.unwrap();
        assert_eq!(entry.location_id, LocationId(1));
    }

    #[tokio::test]
    async fn list_of_empty_route_ignores_filters() {
        let h = harness();
        let query = VisitQuery {
            start: Some(Utc::now()),
            end: Some(Utc::now()),
            from: 0,
            size: 10,
        };

        let page = h.service.list(&AnimalId(1), &query).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn list_orders_by_visit_time_and_slices() {
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();
        let v2 = h.service.append(&AnimalId(1), &LocationId(3)).await.unwrap();
        let v3 = h.service.append(&AnimalId(1), &LocationId(4)).await.unwrap();

        let all = h.service.list(&AnimalId(1), &unbounded()).await.unwrap();
        assert_eq!(
            all.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec![v1.id, v2.id, v3.id]
        );

        let page = h
            .service
            .list(
                &AnimalId(1),
                &VisitQuery {
                    start: None,
                    end: None,
                    from: 1,
                    size: 1,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.iter().map(|v| v.id).collect::<Vec<_>>(), vec![v2.id]);
    }

    #[tokio::test]
    async fn list_respects_time_bounds() {
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();
        let v2 = h.service.append(&AnimalId(1), &LocationId(3)).await.unwrap();

        let page = h
            .service
            .list(
                &AnimalId(1),
                &VisitQuery {
                    start: Some(v2.visit_datetime),
                    end: None,
                    from: 0,
                    size: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.iter().map(|v| v.id).collect::<Vec<_>>(), vec![v2.id]);

        let page = h
            .service
            .list(
                &AnimalId(1),
                &VisitQuery {
                    start: None,
                    end: Some(v1.visit_datetime),
                    from: 0,
                    size: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.iter().map(|v| v.id).collect::<Vec<_>>(), vec![v1.id]);
    }

    #[tokio::test]
    async fn removing_the_sole_entry_empties_route_and_ledger() {
        let h = harness();
        let entry = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        h.service.remove(&AnimalId(1), &entry.id).await.unwrap();

        assert!(route_ids(&h).await.is_empty());
        assert!(h.visits.find_by_id(&entry.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_the_head_cascades_onto_a_chipping_location_head() {
        // chipped at 1, route 2 -> 1 -> 3
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();
        let v2 = h.service.append(&AnimalId(1), &LocationId(1)).await.unwrap();
        let v3 = h.service.append(&AnimalId(1), &LocationId(3)).await.unwrap();

        h.service.remove(&AnimalId(1), &v1.id).await.unwrap();

        // the route shrank by two: v2 became a redundant head and went too
        assert_eq!(route_ids(&h).await, vec![v3.id.0]);
        assert!(h.visits.find_by_id(&v2.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_the_head_without_collision_does_not_cascade() {
        // chipped at 1, route 2 -> 3
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();
        let v2 = h.service.append(&AnimalId(1), &LocationId(3)).await.unwrap();

        h.service.remove(&AnimalId(1), &v1.id).await.unwrap();

        assert_eq!(route_ids(&h).await, vec![v2.id.0]);
    }

    #[tokio::test]
    async fn removing_an_entry_of_another_animal_is_not_found() {
        let h = harness();
        let stray = test_animal(2, 1);
        h.animals.insert_animal(stray);
        let entry = h.service.append(&AnimalId(2), &LocationId(2)).await.unwrap();

        let result = h.service.remove(&AnimalId(1), &entry.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn removing_a_missing_entry_is_not_found() {
        let h = harness();

        let result = h
            .service
            .remove(&AnimalId(1), &VisitedLocationId(99))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_requires_membership() {
        let h = harness();
        let stray = test_animal(2, 1);
        h.animals.insert_animal(stray);
        let entry = h.service.append(&AnimalId(2), &LocationId(2)).await.unwrap();

        let result = h
            .service
            .update(&AnimalId(1), &entry.id, &LocationId(3))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_requires_the_new_location_to_exist() {
        let h = harness();
        let entry = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        let result = h
            .service
            .update(&AnimalId(1), &entry.id, &LocationId(9))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_rejects_noop_and_neighbour_collisions() {
        // route 2 -> 3 -> 4
        let h = harness();
        let _v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();
        let v2 = h.service.append(&AnimalId(1), &LocationId(3)).await.unwrap();
        let _v3 = h.service.append(&AnimalId(1), &LocationId(4)).await.unwrap();

        for target in [3, 2, 4] {
            let result = h
                .service
                .update(&AnimalId(1), &v2.id, &LocationId(target))
                .await;
            assert!(
                matches!(result, Err(AppError::BadRequest(_))),
                "location {target} must be rejected"
            );
        }

        let updated = h
            .service
            .update(&AnimalId(1), &v2.id, &LocationId(1))
            .await
            .unwrap();
        assert_eq!(updated.location_id, LocationId(1));
    }

    #[tokio::test]
    async fn update_rejects_head_moving_to_the_chipping_location() {
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        let result = h
            .service
            .update(&AnimalId(1), &v1.id, &LocationId(1))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn update_keeps_the_visit_timestamp() {
        let h = harness();
        let v1 = h.service.append(&AnimalId(1), &LocationId(2)).await.unwrap();

        let updated = h
            .service
            .update(&AnimalId(1), &v1.id, &LocationId(3))
            .await
            .unwrap();

        assert_eq!(updated.visit_datetime, v1.visit_datetime);
        assert_eq!(updated.location_id, LocationId(3));
    }
}
