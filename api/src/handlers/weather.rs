//! Weather handlers
//!
//! Endpoints resolving a postal code to the current temperature.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::WeatherReport;
use crate::error::AppError;
use crate::AppState;

/// Request body for POST /weather
///
/// A missing or null `cep`, or a `null` body, is treated as empty and
/// rejected as an invalid zipcode.
#[derive(Debug, Default, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    cep: Option<String>,
}

impl CepRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let request: Option<Self> = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Rejecting undecodable request body");
            AppError::BadRequest(e.to_string())
        })?;
        Ok(request.unwrap_or_default())
    }

    pub fn cep(&self) -> &str {
        self.cep.as_deref().unwrap_or_default()
    }
}

/// GET /weather/:cep
///
/// Current temperature for the city of a postal code.
pub async fn get_weather(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<WeatherReport>, AppError> {
    let report = state.lookup.lookup(&cep).await?;
    Ok(Json(report))
}

/// POST /weather
///
/// Same as the GET route, with the postal code in a `{"cep": "..."}` body.
pub async fn post_weather(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WeatherReport>, AppError> {
    let request = CepRequest::from_slice(&body)?;
    let report = state.lookup.lookup(request.cep()).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cep_request() {
        let request = CepRequest::from_slice(br#"{"cep": "22450-000"}"#).unwrap();
        assert_eq!(request.cep(), "22450-000");
    }

    #[test]
    fn missing_cep_defaults_to_empty() {
        let request = CepRequest::from_slice(b"{}").unwrap();
        assert_eq!(request.cep(), "");
    }

    #[test]
    fn null_cep_defaults_to_empty() {
        let request = CepRequest::from_slice(br#"{"cep": null}"#).unwrap();
        assert_eq!(request.cep(), "");
    }

    #[test]
    fn null_body_defaults_to_empty() {
        let request = CepRequest::from_slice(b"null").unwrap();
        assert_eq!(request.cep(), "");
    }

    #[test]
    fn ignores_unknown_fields() {
        let request = CepRequest::from_slice(br#"{"cep": "01001000", "extra": 1}"#).unwrap();
        assert_eq!(request.cep(), "01001000");
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let bodies: [&[u8]; 3] = [b"not json", b"", br#"{"cep": 22450000}"#];
        for body in bodies {
            let result = CepRequest::from_slice(body);
            assert!(
                matches!(result, Err(AppError::BadRequest(_))),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }
}
