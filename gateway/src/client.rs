//! HTTP client for the CEP weather lookup service
//!
//! The gateway validates the postal code, forwards it in a single POST and
//! hands back whatever the lookup service answered.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use cep_common::PostalCode;
use serde::Serialize;

use crate::error::ForwardError;

#[derive(Debug, Serialize)]
struct CepRequest<'a> {
    cep: &'a PostalCode,
}

/// A lookup service response, relayed byte-for-byte
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        (self.status, [(CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

/// HTTP client for communicating with the lookup service
#[derive(Clone)]
pub struct WeatherServiceClient {
    client: reqwest::Client,
    url: String,
}

impl WeatherServiceClient {
    /// Create a client posting to `url`, giving up on a call after `timeout`
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    #[cfg(test)]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Validate `raw` and forward it to the lookup service.
    ///
    /// Invalid codes are rejected without a network call. Any response from
    /// the lookup service is returned unchanged, whatever its status.
    #[tracing::instrument(
        name = "forward",
        skip(self, raw),
        fields(cep = %raw, url = %self.url, http.status_code = tracing::field::Empty)
    )]
    pub async fn forward(&self, raw: &str) -> Result<Relayed, ForwardError> {
        let code = PostalCode::parse(raw)?;

        let response = cep_common::trace_context::inject(self.client.post(&self.url))
            .json(&CepRequest { cep: &code })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %self.url, "Weather service request failed");
                e
            })?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, url = %self.url, "Failed to read weather service response");
            e
        })?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Relaying response");
        Ok(Relayed {
            status,
            content_type,
            body,
        })
    }
}
