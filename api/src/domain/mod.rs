//! Domain layer
//!
//! Contains pure lookup logic with no transport dependencies.
//! - `entities`: request-scoped values (postal code, city, temperature)
//! - `ports`: resolver traits implemented by upstream adapters
//! - `deadline`: the timeout value threaded through every stage

pub mod deadline;
pub mod entities;
pub mod ports;

pub use deadline::Deadline;
