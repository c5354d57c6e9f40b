//! Shared building blocks for the CEP weather services
//!
//! - `postal_code`: the single validation rule applied at both network hops
//! - `trace_context`: W3C `traceparent` propagation between the services

pub mod postal_code;
pub mod trace_context;

pub use postal_code::{InvalidPostalCode, PostalCode};
pub use trace_context::{TraceContext, TRACEPARENT};
