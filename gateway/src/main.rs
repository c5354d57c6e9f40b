//! CEP Weather Gateway
//!
//! Edge service accepting `POST /weather` with a `{"cep": "..."}` body. Postal
//! codes are validated here, then forwarded to the lookup service, whose
//! answer is relayed unchanged.

mod client;
mod config;
mod error;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::WeatherServiceClient;
use config::Config;
use server::GatewayState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cep_weather_gateway=debug,cep_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CEP weather gateway...");

    let config = Config::from_env();
    tracing::info!(
        url = %config.weather_service_url,
        timeout_secs = config.timeout.as_secs(),
        "Forwarding to weather service"
    );

    let client = WeatherServiceClient::new(&config.weather_service_url, config.timeout)?;
    let app = server::router(GatewayState {
        client: Arc::new(client),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
