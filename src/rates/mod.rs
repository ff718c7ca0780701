//! Exchange-rate lookup used to convert storefront prices.

mod client;
mod models;

pub use client::{RateClient, RateProvider, DEFAULT_RATES_URL};
pub use models::RateSnapshot;
