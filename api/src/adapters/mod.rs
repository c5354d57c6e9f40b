//! Adapters layer
//!
//! Implementations of port traits for the upstream providers.

pub mod retry;
pub mod viacep;
pub mod weatherapi;

pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;
