//! appstore-prices - Compare App Store prices across storefronts
//!
//! Fetches per-region App Store prices from a scraping endpoint, converts them into a
//! single target currency and groups identical price points across countries.

pub mod appstore;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod rates;
pub mod store;

pub use appstore::{PriceEntry, PriceTable, RawPayload, TableRow};
pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{Completion, PipelineState, ReconciliationPipeline};
pub use rates::RateSnapshot;
