//! Domain ports (traits)
//!
//! The orchestrator only sees these traits, so a provider can be swapped by
//! adding an adapter without touching the lookup flow.

pub mod geo;
pub mod weather;

pub use geo::GeoResolver;
pub use weather::WeatherResolver;
