//! Exchange-rate snapshot model.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Point-in-time rates relative to a base (target) currency.
///
/// `rate(code)` is the amount of `code` equal to one unit of the base currency, so a
/// price in `code` converts to the base currency as `price / rate`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateSnapshot {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateSnapshot {
    /// Creates a snapshot from a rate mapping.
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self { base: base.into(), rates }
    }

    /// Base currency of this snapshot.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the usable rate for a currency. Zero, negative and non-finite rates
    /// count as absent.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied().filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Converts an amount in `code` into the base currency.
    pub fn convert(&self, amount: f64, code: &str) -> Option<f64> {
        self.rate(code).map(|rate| amount / rate)
    }

    /// Number of currencies in the snapshot.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the snapshot holds no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Response body of the exchange-rate service.
#[derive(Debug, Deserialize)]
pub(crate) struct RatesResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, rename = "error-type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub rates: Option<HashMap<String, Value>>,
}

impl RatesResponse {
    /// Converts the response into a snapshot, keeping only numeric rates.
    pub fn into_snapshot(self, target: &str) -> Result<RateSnapshot, String> {
        if self.result.as_deref() == Some("error") {
            return Err(self.error_type.unwrap_or_else(|| "unknown error".to_string()));
        }

        let Some(raw) = self.rates else {
            return Err("response has no rates".to_string());
        };

        let rates = raw
            .into_iter()
            .filter_map(|(code, value)| value.as_f64().map(|rate| (code, rate)))
            .collect();

        let base = self.base_code.unwrap_or_else(|| target.to_string());
        Ok(RateSnapshot::new(base, rates))
    }
}
