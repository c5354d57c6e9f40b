//! Mock implementations of port traits
//!
//! In-memory resolvers configured per test. They record how often they were
//! called and with which deadline so tests can assert on orchestration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{CityName, PostalCode, Temperature};
use crate::domain::ports::{GeoResolver, WeatherResolver};
use crate::domain::Deadline;
use crate::error::{GeoError, WeatherError};

// ============================================================================
// Mock Geo Resolver
// ============================================================================

/// Unknown postal codes resolve to [`GeoError::NotFound`]
#[derive(Default)]
pub struct MockGeoResolver {
    outcomes: HashMap<String, Result<String, GeoError>>,
    calls: AtomicUsize,
    last_deadline: RwLock<Option<Deadline>>,
}

impl MockGeoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, cep: &str, city: &str) -> Self {
        self.outcomes.insert(cep.to_string(), Ok(city.to_string()));
        self
    }

    pub fn with_error(mut self, cep: &str, error: GeoError) -> Self {
        self.outcomes.insert(cep.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_deadline(&self) -> Option<Deadline> {
        *self.last_deadline.read().unwrap()
    }
}

#[async_trait]
impl GeoResolver for MockGeoResolver {
    async fn resolve(&self, code: &PostalCode, deadline: Deadline) -> Result<CityName, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_deadline.write().unwrap() = Some(deadline);

        match self.outcomes.get(code.as_str()) {
            Some(Ok(city)) => CityName::new(city.clone()).ok_or(GeoError::NotFound),
            Some(Err(e)) => Err(e.clone()),
            None => Err(GeoError::NotFound),
        }
    }
}

// ============================================================================
// Mock Weather Resolver
// ============================================================================

/// Unknown cities resolve to [`WeatherError::CityNotFound`]
#[derive(Default)]
pub struct MockWeatherResolver {
    outcomes: HashMap<String, Result<Temperature, WeatherError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_deadline: RwLock<Option<Deadline>>,
}

impl MockWeatherResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, city: &str, temperature: Temperature) -> Self {
        self.outcomes.insert(city.to_string(), Ok(temperature));
        self
    }

    pub fn with_error(mut self, city: &str, error: WeatherError) -> Self {
        self.outcomes.insert(city.to_string(), Err(error));
        self
    }

    /// Sleep before answering, ignoring the deadline it was given
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_deadline(&self) -> Option<Deadline> {
        *self.last_deadline.read().unwrap()
    }
}

#[async_trait]
impl WeatherResolver for MockWeatherResolver {
    async fn resolve(
        &self,
        city: &CityName,
        deadline: Deadline,
    ) -> Result<Temperature, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_deadline.write().unwrap() = Some(deadline);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcomes.get(city.as_str()) {
            Some(outcome) => outcome.clone(),
            None => Err(WeatherError::CityNotFound),
        }
    }
}
