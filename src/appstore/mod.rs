//! App Store scraper client, price models and currency catalogue.

pub mod client;
pub mod currencies;
pub mod models;

pub use client::{PriceSource, ScraperClient};
pub use models::{PriceEntry, PriceTable, RawPayload, TableRow};
