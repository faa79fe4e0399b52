//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod account_repo;
pub mod animal_repo;
pub mod animal_type_repo;
pub mod location_repo;
pub mod visited_location_repo;

pub use account_repo::PostgresAccountRepository;
pub use animal_repo::PostgresAnimalRepository;
pub use animal_type_repo::PostgresAnimalTypeRepository;
pub use location_repo::PostgresLocationRepository;
pub use visited_location_repo::PostgresVisitedLocationRepository;
