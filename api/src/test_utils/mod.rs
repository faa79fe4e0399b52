//! Test utilities
//!
//! In-memory implementations of the repository ports plus entity
//! fixtures. The visited-location repository shares the animal map with
//! the animal repository, mirroring how the real adapters keep the
//! ledger table and the animals' visit lists consistent.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
