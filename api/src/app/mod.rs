//! Application layer
//!
//! Contains the lookup use case. It coordinates the resolver ports and owns
//! the outer deadline.

pub mod lookup_service;

pub use lookup_service::LookupService;
