//! Gateway HTTP server
//!
//! Exposes `POST /weather` at the edge and forwards each request to the
//! lookup service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::client::{Relayed, WeatherServiceClient};
use crate::error::ForwardError;

/// State shared across gateway handlers
#[derive(Clone)]
pub struct GatewayState {
    pub client: Arc<WeatherServiceClient>,
}

/// Inbound request body; a missing or null `cep` is treated as empty
#[derive(Debug, Default, Deserialize)]
struct WeatherRequest {
    #[serde(default)]
    cep: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /weather
async fn post_weather(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Relayed, ForwardError> {
    let request: Option<WeatherRequest> = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting undecodable request body");
        ForwardError::BadRequest(e.to_string())
    })?;
    let cep = request.and_then(|r| r.cep).unwrap_or_default();

    state.client.forward(&cep).await
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", post(post_weather))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cep_common::trace_context::propagate))
        .with_state(state)
}
