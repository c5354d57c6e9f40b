//! Unified error types for the CEP weather API
//!
//! Failures are classified where they originate and mapped to a status once:
//! - `GeoError`: geocoding (ViaCEP) failures
//! - `WeatherError`: weather provider failures
//! - `AppError`: everything a handler can return (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cep_common::InvalidPostalCode;
use serde::Serialize;
use thiserror::Error;

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    #[error("can not find zipcode")]
    NotFound,

    #[error("geocoding request failed: {0}")]
    InternalFailure(String),
}

/// Weather provider errors
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("weather API key not configured")]
    ConfigurationFailure,

    #[error("city not found")]
    CityNotFound,

    #[error("all weather API requests failed: {0}")]
    UpstreamUnavailable(String),

    #[error("weather API request failed: {0}")]
    UpstreamFailure(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidFormat(#[from] InvalidPostalCode),

    #[error("Geocoding error: {0}")]
    Geo(#[from] GeoError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Lookup did not finish before its deadline")]
    DeadlineExceeded,

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Status and public message for this error
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidFormat(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid zipcode"),
            AppError::Geo(GeoError::NotFound) => (StatusCode::NOT_FOUND, "can not find zipcode"),
            AppError::Geo(GeoError::InternalFailure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            AppError::Weather(WeatherError::ConfigurationFailure) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "weather service configuration error",
            ),
            AppError::Weather(WeatherError::CityNotFound) => {
                (StatusCode::NOT_FOUND, "city not found in weather service")
            }
            AppError::Weather(
                WeatherError::UpstreamUnavailable(_) | WeatherError::UpstreamFailure(_),
            ) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to get weather data",
            ),
            AppError::DeadlineExceeded => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid request format"),
        }
    }
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Lookup failed");
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Lookup rejected");
        }

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });

        (status, body).into_response()
    }
}
