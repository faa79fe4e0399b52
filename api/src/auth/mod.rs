//! Authentication
//!
//! HTTP Basic authentication against stored account credentials.

pub mod basic;

pub use basic::{extract_credentials, optional_auth, required_auth, Credentials};
