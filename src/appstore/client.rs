//! HTTP client for the upstream App Store scraping endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Trait for fetching scraped prices - enables mocking for tests.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the raw JSON body the scraper returns for an app.
    async fn fetch(&self, endpoint: &str, app_id: &str) -> Result<Value>;
}

/// Client for the scraper endpoint (typically a serverless function URL).
pub struct ScraperClient {
    client: Client,
}

impl ScraperClient {
    /// Creates a new client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build scraper HTTP client")?;

        Ok(Self { client })
    }

    /// Builds the request URL, appending `appId` to any query the endpoint already has.
    fn request_url(endpoint: &str, app_id: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}appId={}", endpoint, separator, urlencoding::encode(app_id))
    }
}

#[async_trait]
impl PriceSource for ScraperClient {
    async fn fetch(&self, endpoint: &str, app_id: &str) -> Result<Value> {
        let url = Self::request_url(endpoint, app_id);

        info!("Fetching prices for app {}", app_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        let body = response.text().await.context("Failed to read response body")?;
        serde_json::from_str(&body).context("Response body is not valid JSON")
    }
}
