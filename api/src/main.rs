//! CEP Weather API Server
//!
//! Resolves a Brazilian postal code (CEP) to its city through ViaCEP, then
//! reports the city's current temperature in Celsius, Fahrenheit and Kelvin
//! through WeatherAPI. Uses hexagonal (ports & adapters) architecture.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ViaCepClient, WeatherApiClient};
use app::LookupService;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<LookupService>,
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

/// Build the HTTP router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Lookups
        .route("/weather", post(handlers::post_weather))
        .route("/weather/:cep", get(handlers::get_weather))
        // Middleware; trace context wraps everything so TraceLayer spans inherit it
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cep_common::trace_context::propagate))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cep_weather_api=debug,cep_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CEP weather API...");

    // Load configuration
    let config = Config::from_env();
    if !config.weather_api_configured() {
        tracing::warn!("WEATHER_API_KEY is not set; weather lookups will fail");
    }

    // One outbound client, shared by both adapters
    let http = reqwest::Client::builder()
        .timeout(config.http_client_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    // Create adapters
    let geo = Arc::new(ViaCepClient::new(http.clone(), config.viacep_base_url.clone()));
    let weather = Arc::new(WeatherApiClient::new(
        http,
        config.weather_api_url.clone(),
        config.weather_api_key.clone(),
    ));

    // Create application services
    let state = AppState {
        lookup: Arc::new(LookupService::new(geo, weather)),
    };

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
