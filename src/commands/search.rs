//! Search command implementation.

use crate::appstore::{currencies, PriceSource, ScraperClient};
use crate::config::Config;
use crate::format::{Formatter, ProductView};
use crate::pipeline::{Completion, ReconciliationPipeline, SortDirection, SortKey, SortState};
use crate::rates::{RateClient, RateProvider};
use crate::store::EndpointStore;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Per-invocation search options.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Product to show; defaults to the first product alphabetically
    pub product: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
    /// Show every product instead of a single one
    pub all_products: bool,
}

impl SearchOptions {
    fn sort_state(&self) -> SortState {
        let direction =
            if self.descending { SortDirection::Descending } else { SortDirection::Ascending };
        SortState::new(self.sort, direction)
    }
}

/// Fetches, converts and prints the regional prices of an app.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search against the configured scraper and rate service.
    pub async fn execute(
        &self,
        app_id: &str,
        options: &SearchOptions,
        endpoint: Box<dyn EndpointStore>,
    ) -> Result<String> {
        let source =
            ScraperClient::new(self.config.timeout()).context("Failed to create HTTP client")?;
        let rates = RateClient::with_base_url(self.config.rates_url.clone(), self.config.timeout())
            .context("Failed to create rate client")?;

        self.execute_with_clients(Box::new(source), Box::new(rates), endpoint, app_id, options)
            .await
    }

    /// Executes the search with provided clients (for testing).
    pub async fn execute_with_clients(
        &self,
        source: Box<dyn PriceSource>,
        rates: Box<dyn RateProvider>,
        endpoint: Box<dyn EndpointStore>,
        app_id: &str,
        options: &SearchOptions,
    ) -> Result<String> {
        info!("Searching prices for app: {}", app_id);

        if !currencies::is_known(&self.config.target_currency) {
            warn!("Currency {} is not in the catalogue", self.config.target_currency);
        }

        let pipeline =
            ReconciliationPipeline::new(source, rates, endpoint, &self.config.target_currency)
                .with_sort(options.sort_state());

        match pipeline.search(app_id).await? {
            Completion::Applied => {}
            Completion::Skipped => anyhow::bail!(
                "No valid target currency configured ('{}'). Use --currency <CODE>.",
                self.config.target_currency
            ),
            Completion::Stale => anyhow::bail!("Search for app {} was superseded", app_id),
        }

        let products = pipeline.available_products().await;
        debug!("Products found: {}", products.join(", "));

        let selected: Vec<String> = if options.all_products {
            products
        } else if let Some(product) = &options.product {
            if !pipeline.select_product(product).await {
                anyhow::bail!("Unknown product '{}'. Available: {}", product, products.join(", "));
            }
            vec![product.clone()]
        } else {
            pipeline.selected_product().await.into_iter().collect()
        };

        let target_currency = pipeline.target_currency().await;
        let mut views = Vec::with_capacity(selected.len());
        for product in selected {
            pipeline.select_product(&product).await;
            views.push(ProductView {
                product,
                target_currency: target_currency.clone(),
                rows: pipeline.view().await,
            });
        }

        info!("Showing {} product(s)", views.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_views(&views))
    }
}
