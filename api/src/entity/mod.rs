//! SeaORM table models
//!
//! Persistence models, separate from the domain entities in
//! `domain::entities`. The `animals` table denormalizes its type list and
//! visit list as `int8[]` columns; the visited-location bodies live in
//! their own table keyed by those ids.

pub mod accounts;
pub mod animal_types;
pub mod animals;
pub mod locations;
pub mod visited_locations;
