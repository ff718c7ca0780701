//! HTTP client for the exchange-rate service.

use super::models::{RateSnapshot, RatesResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Default exchange-rate service.
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest";

/// Trait for fetching exchange rates - enables mocking for tests.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches rates expressed as target -> other currency.
    async fn rates(&self, target: &str) -> Result<RateSnapshot>;
}

/// Exchange-rate HTTP client.
pub struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    /// Creates a client for the default service.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_RATES_URL.to_string(), timeout)
    }

    /// Creates a client with a custom base URL.
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build rates HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl RateProvider for RateClient {
    async fn rates(&self, target: &str) -> Result<RateSnapshot> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(target));

        info!("Fetching exchange rates for {}", target);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            anyhow::bail!("Rate service returned status: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        let parsed: RatesResponse =
            serde_json::from_str(&body).context("Rate response is not valid JSON")?;

        let snapshot = parsed
            .into_snapshot(target)
            .map_err(|e| anyhow::anyhow!("Rate service error: {}", e))?;

        debug!("Received {} rates relative to {}", snapshot.len(), snapshot.base());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(uri: String) -> RateClient {
        RateClient::with_base_url(uri, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let client = RateClient::new(Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, DEFAULT_RATES_URL);
    }

    #[tokio::test]
    async fn test_rates_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"result":"success","base_code":"USD","rates":{"USD":1,"EUR":0.92}}"#,
            ))
            .mount(&mock_server)
            .await;

        let snapshot = make_client(mock_server.uri()).rates("USD").await.unwrap();
        assert_eq!(snapshot.base(), "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.92));
    }

    #[tokio::test]
    async fn test_rates_trailing_slash_base() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/AUD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{"AUD":1}}"#))
            .mount(&mock_server)
            .await;

        let client = make_client(format!("{}/", mock_server.uri()));
        assert!(client.rates("AUD").await.is_ok());
    }

    #[tokio::test]
    async fn test_rates_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = make_client(mock_server.uri()).rates("USD").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_rates_service_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"result":"error","error-type":"unsupported-code"}"#,
            ))
            .mount(&mock_server)
            .await;

        let result = make_client(mock_server.uri()).rates("QQQ").await;
        assert!(result.unwrap_err().to_string().contains("unsupported-code"));
    }
}
