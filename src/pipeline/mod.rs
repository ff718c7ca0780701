//! Reconciliation pipeline: fetch scraped prices, convert, group and sort them.
//!
//! The pipeline is driven by explicit input events (`search`, `set_target_currency`,
//! `refresh`) instead of ambient reactivity. Every search and every conversion takes a
//! generation number; a response that arrives after a newer request started is
//! dropped without touching the pipeline, so the newest request always wins.

pub mod grouper;
pub mod sorter;
pub mod state;

pub use grouper::PriceGrouper;
pub use sorter::{SortDirection, SortKey, SortState, TableSorter};
pub use state::{Completion, PipelineState};

use crate::appstore::currencies;
use crate::appstore::{PriceSource, PriceTable, RawPayload, TableRow};
use crate::error::PipelineError;
use crate::rates::RateProvider;
use crate::store::EndpointStore;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Mutable pipeline data. Never held across a network call.
#[derive(Default)]
struct Inner {
    raw: Option<Arc<RawPayload>>,
    target_currency: String,
    table: Option<Arc<PriceTable>>,
    selected_product: Option<String>,
    sort: SortState,
    search_generation: u64,
    convert_generation: u64,
}

/// Orchestrates scrape -> rates -> grouping -> sorted view.
pub struct ReconciliationPipeline {
    source: Box<dyn PriceSource>,
    rates: Box<dyn RateProvider>,
    endpoint: Box<dyn EndpointStore>,
    inner: Mutex<Inner>,
    state: watch::Sender<PipelineState>,
}

impl ReconciliationPipeline {
    /// Creates an idle pipeline converting into `target_currency`.
    pub fn new(
        source: Box<dyn PriceSource>,
        rates: Box<dyn RateProvider>,
        endpoint: Box<dyn EndpointStore>,
        target_currency: &str,
    ) -> Self {
        let inner = Inner {
            target_currency: currencies::normalize(target_currency).unwrap_or_default(),
            ..Inner::default()
        };
        let (state, _) = watch::channel(PipelineState::Idle);

        Self { source, rates, endpoint, inner: Mutex::new(inner), state }
    }

    /// Sets the initial sort column and direction.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.inner.get_mut().sort = sort;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Searches prices for an app and converts them into the target currency.
    ///
    /// Requires a configured endpoint and a non-empty app id; otherwise fails without
    /// touching the network. Starting a search discards all previous results.
    /// Returns `Completion::Skipped` when the data was fetched but no target currency
    /// is set.
    pub async fn search(&self, app_id: &str) -> Result<Completion, PipelineError> {
        let Some(endpoint) = self.endpoint.get() else {
            warn!("Search attempted without a configured endpoint");
            return Err(self.publish_error(PipelineError::Configuration));
        };

        let app_id = app_id.trim();
        if app_id.is_empty() {
            return Err(self.publish_error(PipelineError::Validation(
                "Please enter an App ID.".to_string(),
            )));
        }

        let generation = {
            let mut inner = self.inner.lock().await;
            inner.search_generation += 1;
            inner.convert_generation += 1;
            inner.raw = None;
            inner.table = None;
            inner.selected_product = None;
            self.state.send_replace(PipelineState::Fetching { app_id: app_id.to_string() });
            inner.search_generation
        };

        let result = self.source.fetch(&endpoint, app_id).await;

        let raw = match result {
            Ok(value) => match RawPayload::from_response(value) {
                Ok(raw) => Arc::new(raw),
                Err(msg) => {
                    return self.fail_search(generation, PipelineError::MalformedPayload(msg)).await
                }
            },
            Err(e) => {
                return self.fail_search(generation, PipelineError::Fetch(format!("{:#}", e))).await
            }
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.search_generation != generation {
                debug!("Discarding stale scrape response for app {}", app_id);
                return Ok(Completion::Stale);
            }
            if raw.is_empty() {
                debug!("Scraper returned an empty payload for app {}", app_id);
            }
            inner.raw = Some(Arc::clone(&raw));
            self.state.send_replace(PipelineState::Fetched { raw });
        }

        info!("Fetched prices for app {}", app_id);
        self.convert().await
    }

    /// Changes the target currency, re-converting existing scraper data.
    ///
    /// An empty code clears the target; a code that is not three letters is rejected.
    /// Setting the currency already converted into makes no network call.
    pub async fn set_target_currency(&self, code: &str) -> Result<Completion, PipelineError> {
        let code = if code.trim().is_empty() {
            String::new()
        } else {
            currencies::normalize(code).ok_or_else(|| {
                self.publish_error(PipelineError::Validation(format!(
                    "Invalid currency code: '{}'",
                    code.trim()
                )))
            })?
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.target_currency == code && inner.table.is_some() {
                return Ok(Completion::Skipped);
            }
            inner.target_currency = code;
        }

        self.convert().await
    }

    /// Re-runs the conversion for the current scraper data and target currency.
    pub async fn refresh(&self) -> Result<Completion, PipelineError> {
        self.convert().await
    }

    async fn convert(&self) -> Result<Completion, PipelineError> {
        let (generation, raw, target) = {
            let mut inner = self.inner.lock().await;
            let Some(raw) = inner.raw.clone() else {
                return Ok(Completion::Skipped);
            };
            if inner.target_currency.is_empty() {
                return Ok(Completion::Skipped);
            }

            inner.convert_generation += 1;
            inner.table = None;
            let target = inner.target_currency.clone();
            self.state.send_replace(PipelineState::Converting {
                raw: Arc::clone(&raw),
                target_currency: target.clone(),
            });
            (inner.convert_generation, raw, target)
        };

        let result = self.rates.rates(&target).await;

        let mut inner = self.inner.lock().await;
        if inner.convert_generation != generation {
            debug!("Discarding stale conversion to {}", target);
            return Ok(Completion::Stale);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = PipelineError::RateFetch(format!("{:#}", e));
                warn!("{}", err);
                inner.table = None;
                self.state.send_replace(PipelineState::Error(err.clone()));
                return Err(err);
            }
        };

        let table = Arc::new(PriceGrouper::new(&snapshot, &target).group(&raw));

        let keep_selection =
            inner.selected_product.as_deref().is_some_and(|p| table.has_product(p));
        if !keep_selection {
            inner.selected_product = table.products.first().cloned();
        }

        info!(
            "Converted {} rows across {} products into {}",
            table.rows.len(),
            table.products.len(),
            target
        );

        inner.table = Some(Arc::clone(&table));
        self.state.send_replace(PipelineState::Ready { table });
        Ok(Completion::Applied)
    }

    async fn fail_search(
        &self,
        generation: u64,
        err: PipelineError,
    ) -> Result<Completion, PipelineError> {
        let inner = self.inner.lock().await;
        if inner.search_generation != generation {
            debug!("Discarding stale scrape failure: {}", err);
            return Ok(Completion::Stale);
        }
        warn!("{}", err);
        self.state.send_replace(PipelineState::Error(err.clone()));
        Err(err)
    }

    fn publish_error(&self, err: PipelineError) -> PipelineError {
        self.state.send_replace(PipelineState::Error(err.clone()));
        err
    }

    /// Selects the product whose rows `view` shows. Returns false for unknown products.
    pub async fn select_product(&self, product: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let known = inner.table.as_ref().is_some_and(|t| t.has_product(product));
        if known {
            inner.selected_product = Some(product.to_string());
        }
        known
    }

    /// Currently selected product.
    pub async fn selected_product(&self) -> Option<String> {
        self.inner.lock().await.selected_product.clone()
    }

    /// Products available in the current table.
    pub async fn available_products(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.table.as_ref().map(|t| t.products.clone()).unwrap_or_default()
    }

    /// Current target currency ("" when unset).
    pub async fn target_currency(&self) -> String {
        self.inner.lock().await.target_currency.clone()
    }

    /// The full table of the last successful conversion.
    pub async fn table(&self) -> Option<Arc<PriceTable>> {
        self.inner.lock().await.table.clone()
    }

    /// Sorts by a column: the active column flips direction, a new one starts ascending.
    pub async fn request_sort(&self, key: SortKey) -> SortState {
        let mut inner = self.inner.lock().await;
        inner.sort.request(key);
        inner.sort
    }

    /// Active sort.
    pub async fn sort_state(&self) -> SortState {
        self.inner.lock().await.sort
    }

    /// Rows of the selected product, in the active sort order.
    pub async fn view(&self) -> Vec<TableRow> {
        let inner = self.inner.lock().await;
        let (Some(table), Some(product)) = (&inner.table, &inner.selected_product) else {
            return Vec::new();
        };
        TableSorter::sort(&table.rows_for(product), inner.sort)
    }
}
