//! Endpoint command implementation: show, save and clear the scraper URL.

use crate::store::EndpointStore;
use anyhow::Result;
use tracing::info;

/// Manages the persisted scraper endpoint.
pub struct EndpointCommand<'a> {
    store: &'a dyn EndpointStore,
}

impl<'a> EndpointCommand<'a> {
    /// Creates a new endpoint command over a store.
    pub fn new(store: &'a dyn EndpointStore) -> Self {
        Self { store }
    }

    /// Describes the effective endpoint.
    pub fn show(&self) -> String {
        match self.store.get() {
            Some(url) => url,
            None => "No endpoint configured. Set one with: appstore-prices endpoint set <URL>"
                .to_string(),
        }
    }

    /// Validates and saves an endpoint.
    pub fn set(&self, url: &str) -> Result<String> {
        if url.trim().is_empty() {
            return self.clear();
        }

        self.store.set(url)?;

        match self.store.get() {
            Some(saved) => {
                info!("Endpoint set to {}", saved);
                Ok(format!("Endpoint saved: {}", saved))
            }
            None => Ok("Endpoint cleared.".to_string()),
        }
    }

    /// Removes the saved endpoint.
    pub fn clear(&self) -> Result<String> {
        self.store.clear()?;
        info!("Endpoint cleared");

        Ok(match self.store.get() {
            Some(fallback) => format!("Endpoint cleared. Falling back to: {}", fallback),
            None => "Endpoint cleared.".to_string(),
        })
    }
}
