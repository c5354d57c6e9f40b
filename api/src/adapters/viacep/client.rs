//! ViaCEP geocoding client
//!
//! One attempt per lookup, bounded by the caller's deadline and a 5s cap.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::domain::entities::{CityName, PostalCode};
use crate::domain::ports::GeoResolver;
use crate::domain::Deadline;
use crate::error::GeoError;

/// Upper bound for a single geocoding call
pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Subset of the ViaCEP address record we rely on
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    erro: bool,
}

/// ViaCEP has sent the not-found flag both as `true` and as `"true"`
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// Implementation of [`GeoResolver`] backed by the ViaCEP REST API
pub struct ViaCepClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ViaCepClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: GEOCODE_TIMEOUT,
        }
    }

    fn lookup_url(&self, code: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, code)
    }
}

#[async_trait]
impl GeoResolver for ViaCepClient {
    #[tracing::instrument(
        name = "viacep.resolve",
        skip(self, deadline),
        fields(
            cep = %code,
            url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            city = tracing::field::Empty,
        )
    )]
    async fn resolve(&self, code: &PostalCode, deadline: Deadline) -> Result<CityName, GeoError> {
        let span = tracing::Span::current();
        let url = self.lookup_url(code);
        span.record("url", url.as_str());

        let deadline = deadline.child(self.timeout);
        tracing::debug!(
            %url,
            remaining_ms = deadline.remaining().as_millis() as u64,
            "Looking up postal code"
        );

        let response = match deadline.run(self.http.get(&url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(error = %e, %url, "Geocoding request failed");
                return Err(GeoError::InternalFailure(e.to_string()));
            }
            Err(_) => {
                tracing::error!(%url, "Geocoding request timed out");
                return Err(GeoError::InternalFailure("request timed out".to_string()));
            }
        };

        let status = response.status();
        span.record("http.status_code", status.as_u16());

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "Geocoding returned non-success status");
            return Err(GeoError::NotFound);
        }

        let body = match deadline.run(response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::error!(error = %e, %url, "Failed to read geocoding response");
                return Err(GeoError::InternalFailure(e.to_string()));
            }
            Err(_) => {
                tracing::error!(%url, "Timed out reading geocoding response");
                return Err(GeoError::InternalFailure("response timed out".to_string()));
            }
        };

        let record: ViaCepResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(error = %e, %url, "Failed to decode geocoding response");
            GeoError::InternalFailure(e.to_string())
        })?;

        if record.erro {
            tracing::info!(cep = %code, "Postal code not found");
            return Err(GeoError::NotFound);
        }

        let Some(city) = CityName::new(record.localidade) else {
            tracing::info!(cep = %code, "Postal code has no city");
            return Err(GeoError::NotFound);
        };

        span.record("city", city.as_str());
        tracing::debug!(cep = %code, city = %city, "Postal code resolved");
        Ok(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_utils::{closed_port_url, RIO_CEP};

    fn rio() -> PostalCode {
        PostalCode::parse(RIO_CEP).unwrap()
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    async fn server_returning(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/ws/{}/json/", RIO_CEP)))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn resolves_city() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({
            "cep": "22450-000",
            "logradouro": "Rua Marquês de São Vicente",
            "bairro": "Gávea",
            "localidade": "Rio de Janeiro",
            "uf": "RJ"
        })))
        .await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let city = client.resolve(&rio(), deadline()).await.unwrap();

        assert_eq!(city.as_str(), "Rio de Janeiro");
    }

    #[tokio::test]
    async fn erro_flag_is_not_found() {
        let server =
            server_returning(ResponseTemplate::new(200).set_body_json(json!({ "erro": true })))
                .await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::NotFound)));
    }

    #[tokio::test]
    async fn erro_flag_as_string_is_not_found() {
        let server =
            server_returning(ResponseTemplate::new(200).set_body_json(json!({ "erro": "true" })))
                .await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::NotFound)));
    }

    #[tokio::test]
    async fn empty_city_is_not_found() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({
            "cep": "22450-000",
            "localidade": ""
        })))
        .await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::NotFound)));
    }

    #[tokio::test]
    async fn non_success_status_is_not_found() {
        let server = server_returning(ResponseTemplate::new(400)).await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::NotFound)));
    }

    #[tokio::test]
    async fn undecodable_body_is_internal_failure() {
        let server =
            server_returning(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::InternalFailure(_))));
    }

    #[tokio::test]
    async fn connection_failure_is_internal_failure() {
        let client = ViaCepClient::new(Client::new(), closed_port_url());

        let result = client.resolve(&rio(), deadline()).await;

        assert!(matches!(result, Err(GeoError::InternalFailure(_))));
    }

    #[tokio::test]
    async fn slow_upstream_is_cut_off_by_deadline() {
        let server = server_returning(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "localidade": "Rio de Janeiro" }))
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let client = ViaCepClient::new(Client::new(), server.uri());

        let result = client
            .resolve(&rio(), Deadline::after(Duration::from_millis(100)))
            .await;

        assert!(matches!(result, Err(GeoError::InternalFailure(_))));
    }

    #[test]
    fn lookup_url_interpolates_code() {
        let client = ViaCepClient::new(Client::new(), "https://viacep.com.br/");
        assert_eq!(
            client.lookup_url(&rio()),
            "https://viacep.com.br/ws/22450000/json/"
        );
    }
}
