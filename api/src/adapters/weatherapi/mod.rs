//! WeatherAPI adapter
//!
//! Current conditions via weatherapi.com.

pub mod client;

pub use client::WeatherApiClient;
