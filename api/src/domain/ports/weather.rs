//! Weather port

use async_trait::async_trait;

use crate::domain::entities::{CityName, Temperature};
use crate::domain::Deadline;
use crate::error::WeatherError;

/// Maps a city name to its current temperature
#[async_trait]
pub trait WeatherResolver: Send + Sync {
    async fn resolve(
        &self,
        city: &CityName,
        deadline: Deadline,
    ) -> Result<Temperature, WeatherError>;
}
