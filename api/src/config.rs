use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherapi.com/v1/current.json";
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// ViaCEP base URL, without the `/ws/...` path
    pub viacep_base_url: String,
    /// Full URL of the WeatherAPI `current.json` endpoint
    pub weather_api_url: String,
    /// WeatherAPI key. Lookups fail with a configuration error while unset
    pub weather_api_key: Option<String>,
    /// Per-request timeout of the shared outbound HTTP client
    pub http_client_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            viacep_base_url: env::var("VIACEP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_VIACEP_BASE_URL.to_string()),
            weather_api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string()),
            weather_api_key: env::var("WEATHER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            http_client_timeout: Duration::from_secs(
                env::var("HTTP_CLIENT_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS),
            ),
        }
    }

    /// Check if the weather provider can be called at all
    pub fn weather_api_configured(&self) -> bool {
        self.weather_api_key.is_some()
    }
}
