//! Domain entities
//!
//! Request-scoped values flowing through a lookup. Nothing here is persisted.

pub mod city;
pub mod temperature;
pub mod weather_report;

pub use cep_common::PostalCode;
pub use city::CityName;
pub use temperature::Temperature;
pub use weather_report::WeatherReport;
