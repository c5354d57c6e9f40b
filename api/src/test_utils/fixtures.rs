//! Test fixtures
//!
//! Common values and helpers for tests.

use std::net::TcpListener;
use std::sync::Arc;

use crate::app::LookupService;
use crate::domain::entities::Temperature;
use crate::test_utils::{MockGeoResolver, MockWeatherResolver};

/// Gávea, Rio de Janeiro
pub const RIO_CEP: &str = "22450000";
pub const RIO_CITY: &str = "Rio de Janeiro";
/// A well-formed code the geocoder does not know
pub const NOT_FOUND_CEP: &str = "99999999";

/// 25°C, as reported for Rio in the fixtures
pub fn rio_temperature() -> Temperature {
    Temperature::from_readings(25.0, None)
}

/// Lookup service knowing only about Rio
pub fn rio_lookup_service() -> LookupService {
    LookupService::new(
        Arc::new(MockGeoResolver::new().with_city(RIO_CEP, RIO_CITY)),
        Arc::new(MockWeatherResolver::new().with_temperature(RIO_CITY, rio_temperature())),
    )
}

/// Base URL of a local port with nothing listening, for connection failures
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
