use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WEATHER_SERVICE_URL: &str = "http://svc-b:8081/weather";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Full URL of the lookup service's `POST /weather` route
    pub weather_service_url: String,
    /// Bound on one forwarded call, connect to last body byte
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            weather_service_url: env::var("WEATHER_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_SERVICE_URL.to_string()),
            timeout: Duration::from_secs(
                env::var("TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ),
        }
    }
}
