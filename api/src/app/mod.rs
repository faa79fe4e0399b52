//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod account_service;
pub mod animal_service;
pub mod animal_type_service;
pub mod location_service;
pub mod visit_service;

pub use account_service::{hash_password, AccountData, AccountService};
pub use animal_service::{AnimalData, AnimalService};
pub use animal_type_service::AnimalTypeService;
pub use location_service::LocationService;
pub use visit_service::{VisitQuery, VisitService};
