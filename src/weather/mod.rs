//! Weather lookup client for the OpenWeatherMap current-weather API
//!
//! [`WeatherLookupClient::lookup`] turns a location query into a
//! [`WeatherSummary`] with exactly one outbound request, or fails with a typed
//! [`LookupError`]. Blank queries fail before any request is made.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::LookupError;
use crate::models::{LocationQuery, WeatherSummary};

pub mod icons;
pub mod openweather;

pub use icons::WeatherIcon;

/// Weather API client
///
/// Holds the API key injected at construction; it never reads configuration
/// while serving a call.
#[derive(Clone)]
pub struct WeatherLookupClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for WeatherLookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherLookupClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherLookupClient {
    /// Create a new weather lookup client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather-mailer/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Get current weather for a location name
    #[instrument(skip(self))]
    pub async fn lookup(&self, query: &str) -> Result<WeatherSummary, LookupError> {
        let query = LocationQuery::parse(query).inspect_err(|_| {
            debug!("Rejecting blank location query");
        })?;

        info!("Looking up current weather for '{}'", query);
        let start_time = Instant::now();

        let body = self.fetch(&query).await?;

        let envelope: openweather::Envelope = serde_json::from_str(&body).map_err(|e| {
            warn!("Weather response is not valid JSON: {}", e);
            LookupError::transport("weather service returned a malformed response")
        })?;

        if let Err(err) = envelope.check() {
            warn!("Weather provider reported failure for '{}': {}", query, err);
            return Err(err);
        }

        let response: openweather::CurrentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Weather response is missing expected fields: {}", e);
            LookupError::transport("weather service returned a malformed response")
        })?;

        let summary = response.into_summary()?;

        info!(
            "Retrieved weather for '{}' in {:.3}s: {}, {}",
            summary.location,
            start_time.elapsed().as_secs_f64(),
            summary.format_temperature(),
            summary.icon_reference
        );

        Ok(summary)
    }

    /// Single GET against the provider; any HTTP status is accepted because
    /// the provider reports failures in the body.
    async fn fetch(&self, query: &LocationQuery) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                let timed_out = e.is_timeout();
                warn!("Weather request failed: {}", e.without_url());
                if timed_out {
                    LookupError::transport("weather service timed out")
                } else {
                    LookupError::transport("weather service could not be reached")
                }
            })?;

        debug!("Weather provider answered HTTP {}", response.status());

        response.text().await.map_err(|e| {
            warn!("Failed to read weather response body: {}", e.without_url());
            LookupError::transport("failed to read weather service response")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherLookupClient {
        let config = WeatherConfig {
            api_key: "test-api-key".to_string(),
            base_url: format!("{}/data/2.5/weather", server.uri()),
            timeout_seconds: 2,
        };
        WeatherLookupClient::new(&config).unwrap()
    }

    fn london() -> serde_json::Value {
        json!({
            "cod": 200,
            "name": "London",
            "main": { "temp": 21.9, "humidity": 64 },
            "wind": { "speed": 5.0 },
            "weather": [{ "icon": "04n" }]
        })
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server).lookup("  London ").await.unwrap();

        assert_eq!(summary.location, "London");
        assert_eq!(summary.temperature_celsius, 21);
        assert_eq!(summary.humidity_percent, 64.0);
        assert_eq!(summary.wind_speed_kmh, 5.0 * 3.6);
        assert_eq!(summary.icon_reference, "drizzle");
    }

    #[tokio::test]
    async fn test_numeric_message_does_not_fail_lookup() {
        let server = MockServer::start().await;
        let mut body = london();
        body["message"] = json!(0);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let summary = client_for(&server).lookup("London").await.unwrap();
        assert_eq!(summary.location, "London");
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.lookup("").await, Err(LookupError::InvalidQuery));
        assert_eq!(client.lookup("   ").await, Err(LookupError::InvalidQuery));
    }

    #[tokio::test]
    async fn test_provider_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("Atlantis").await.unwrap_err();
        assert_eq!(err, LookupError::provider(Some(404), "city not found"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("London").await.unwrap_err();
        assert!(matches!(err, LookupError::TransportError { .. }));
    }

    #[tokio::test]
    async fn test_ok_status_with_missing_fields_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200})))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("London").await.unwrap_err();
        assert!(matches!(err, LookupError::TransportError { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(london())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("London").await.unwrap_err();
        assert_eq!(err, LookupError::transport("weather service timed out"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let config = WeatherConfig {
            api_key: "test-api-key".to_string(),
            base_url: "http://127.0.0.1:9/weather".to_string(),
            timeout_seconds: 2,
        };
        let client = WeatherLookupClient::new(&config).unwrap();

        let err = client.lookup("London").await.unwrap_err();
        assert!(matches!(err, LookupError::TransportError { .. }));
        assert!(!err.to_string().contains("test-api-key"));
    }
}
