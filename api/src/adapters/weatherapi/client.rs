//! WeatherAPI client
//!
//! Current conditions from `current.json`, with transport failures retried
//! per [`RetryPolicy`]. A response that arrives is never retried, whatever its
//! status; it is classified instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use urlencoding::encode;

use crate::adapters::retry::{with_retry, RetryPolicy};
use crate::domain::entities::{CityName, Temperature};
use crate::domain::ports::WeatherResolver;
use crate::domain::Deadline;
use crate::error::WeatherError;

/// Upper bound for one weather lookup, covering every attempt and backoff
pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(5);

/// WeatherAPI error code for "No matching location found"
pub const CITY_NOT_FOUND_CODE: i64 = 1006;

#[derive(Debug, Deserialize)]
struct WeatherApiResponse {
    current: Option<CurrentConditions>,
    error: Option<WeatherApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
    temp_f: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherApiErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Implementation of [`WeatherResolver`] backed by weatherapi.com
pub struct WeatherApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl WeatherApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            timeout: WEATHER_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    fn request_url(&self, api_key: &str, city: &CityName) -> String {
        format!(
            "{}?key={}&q={}",
            self.base_url,
            encode(api_key),
            encode(city.as_str())
        )
    }

    fn classify(
        status: reqwest::StatusCode,
        body: &[u8],
    ) -> Result<Temperature, WeatherError> {
        let parsed: WeatherApiResponse = serde_json::from_slice(body).map_err(|e| {
            tracing::error!(error = %e, status = status.as_u16(), "Failed to decode weather response");
            WeatherError::UpstreamFailure(format!("failed to decode API response: {}", e))
        })?;

        if !status.is_success() {
            let (code, message) = parsed
                .error
                .map(|e| (e.code, e.message))
                .unwrap_or_else(|| (0, status.to_string()));
            tracing::warn!(status = status.as_u16(), code, %message, "Weather API returned an error");

            if code == CITY_NOT_FOUND_CODE {
                return Err(WeatherError::CityNotFound);
            }
            return Err(WeatherError::UpstreamFailure(message));
        }

        let current = parsed.current.ok_or_else(|| {
            tracing::error!("Weather response has no current conditions");
            WeatherError::UpstreamFailure("missing current conditions".to_string())
        })?;

        Ok(Temperature::from_readings(current.temp_c, current.temp_f))
    }
}

#[async_trait]
impl WeatherResolver for WeatherApiClient {
    #[tracing::instrument(
        name = "weatherapi.resolve",
        skip(self, deadline),
        fields(
            city = %city,
            url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            temp_c = tracing::field::Empty,
            temp_f = tracing::field::Empty,
            temp_k = tracing::field::Empty,
        )
    )]
    async fn resolve(
        &self,
        city: &CityName,
        deadline: Deadline,
    ) -> Result<Temperature, WeatherError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("WEATHER_API_KEY is not configured");
            return Err(WeatherError::ConfigurationFailure);
        };

        let span = tracing::Span::current();
        span.record("url", self.base_url.as_str());
        let url = self.request_url(api_key, city);
        let deadline = deadline.child(self.timeout);

        // The query carries the API key, so reqwest errors are stripped of
        // their URL before they are logged or stored
        let response = with_retry(self.retry, deadline, |attempt| {
            tracing::debug!(attempt, "Requesting current weather");
            let request = self.http.get(&url);
            async move { request.send().await.map_err(reqwest::Error::without_url) }
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, url = %self.base_url, "Weather API unreachable");
            WeatherError::UpstreamUnavailable(e.to_string())
        })?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());

        let body = match deadline.run(response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                let e = e.without_url();
                tracing::error!(error = %e, url = %self.base_url, "Failed to read weather response");
                return Err(WeatherError::UpstreamFailure(e.to_string()));
            }
            Err(_) => {
                tracing::error!("Timed out reading weather response");
                return Err(WeatherError::UpstreamFailure(
                    "response timed out".to_string(),
                ));
            }
        };

        let temperature = Self::classify(status, &body)?;

        span.record("temp_c", temperature.celsius);
        span.record("temp_f", temperature.fahrenheit);
        span.record("temp_k", temperature.kelvin);
        tracing::debug!(
            city = %city,
            temp_c = temperature.celsius,
            "Temperature resolved"
        );

        Ok(temperature)
    }
}
