//! Lookup service
//!
//! Runs a postal code through validation, geocoding and the weather lookup,
//! stopping at the first failure. Failure kinds are produced by the stages
//! and passed through untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::domain::entities::{PostalCode, WeatherReport};
use crate::domain::ports::{GeoResolver, WeatherResolver};
use crate::domain::Deadline;
use crate::error::AppError;

/// Wall-clock budget for a whole lookup, retries included
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Service orchestrating the CEP -> city -> temperature lookup
pub struct LookupService {
    geo: Arc<dyn GeoResolver>,
    weather: Arc<dyn WeatherResolver>,
}

impl LookupService {
    pub fn new(geo: Arc<dyn GeoResolver>, weather: Arc<dyn WeatherResolver>) -> Self {
        Self { geo, weather }
    }

    /// Look up `raw` under the standard [`LOOKUP_TIMEOUT`]
    pub async fn lookup(&self, raw: &str) -> Result<WeatherReport, AppError> {
        self.handle(raw, Deadline::after(LOOKUP_TIMEOUT)).await
    }

    /// Look up `raw`, finishing before `deadline`.
    ///
    /// Every stage derives its own deadline from this one. If a stage ignores
    /// it, the whole pipeline is still dropped at the deadline and
    /// [`AppError::DeadlineExceeded`] is returned.
    #[tracing::instrument(name = "lookup", skip(self, raw, deadline), fields(cep = %raw))]
    pub async fn handle(&self, raw: &str, deadline: Deadline) -> Result<WeatherReport, AppError> {
        match deadline.run(self.run_stages(raw, deadline)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(cep = %raw, "Lookup exceeded its deadline");
                Err(AppError::DeadlineExceeded)
            }
        }
    }

    async fn run_stages(&self, raw: &str, deadline: Deadline) -> Result<WeatherReport, AppError> {
        let code = tracing::info_span!("validate").in_scope(|| PostalCode::parse(raw))?;

        let city = self
            .geo
            .resolve(&code, deadline)
            .instrument(tracing::info_span!("resolve_city", cep = %code))
            .await?;

        let temperature = self
            .weather
            .resolve(&city, deadline)
            .instrument(tracing::info_span!("resolve_temperature", city = %city))
            .await?;

        tracing::info!(
            cep = %code,
            city = %city,
            temp_c = temperature.celsius,
            "Lookup complete"
        );
        Ok(WeatherReport::new(city, temperature))
    }
}
