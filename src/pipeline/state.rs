//! Lifecycle states of the reconciliation pipeline.

use crate::appstore::{PriceTable, RawPayload};
use crate::error::PipelineError;
use std::fmt;
use std::sync::Arc;

/// Where the pipeline currently is.
///
/// `Idle -> Fetching -> (Error | Fetched) -> Converting -> (Error | Ready)`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// Waiting for the scraper.
    Fetching { app_id: String },
    /// Scraper data is in, no target currency to convert into yet.
    Fetched { raw: Arc<RawPayload> },
    /// Waiting for exchange rates.
    Converting { raw: Arc<RawPayload>, target_currency: String },
    /// Rows are available.
    Ready { table: Arc<PriceTable> },
    Error(PipelineError),
}

impl PipelineState {
    /// Returns true while a network call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Fetching { .. } | PipelineState::Converting { .. })
    }

    /// Returns the error if the pipeline failed.
    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            PipelineState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the table if the pipeline is ready.
    pub fn table(&self) -> Option<&Arc<PriceTable>> {
        match self {
            PipelineState::Ready { table } => Some(table),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Fetching { app_id } => write!(f, "fetching app {}", app_id),
            PipelineState::Fetched { .. } => write!(f, "fetched"),
            PipelineState::Converting { target_currency, .. } => {
                write!(f, "converting to {}", target_currency)
            }
            PipelineState::Ready { table } => {
                write!(f, "ready ({} rows, {} products)", table.rows.len(), table.products.len())
            }
            PipelineState::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// How an operation that passed validation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied to the pipeline.
    Applied,
    /// A newer request superseded this one; its result was discarded.
    Stale,
    /// Nothing to do (no scraper data or no target currency yet).
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_states() {
        assert!(!PipelineState::Idle.is_busy());
        assert!(PipelineState::Fetching { app_id: "1".into() }.is_busy());
        assert!(PipelineState::Converting {
            raw: Arc::new(RawPayload::default()),
            target_currency: "USD".into()
        }
        .is_busy());
        assert!(!PipelineState::Error(PipelineError::Configuration).is_busy());
    }

    #[test]
    fn test_accessors() {
        let state = PipelineState::Error(PipelineError::Configuration);
        assert_eq!(state.error(), Some(&PipelineError::Configuration));
        assert!(state.table().is_none());

        let state = PipelineState::Ready { table: Arc::new(PriceTable::default()) };
        assert!(state.error().is_none());
        assert!(state.table().unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(PipelineState::Idle.to_string(), "idle");
        assert_eq!(
            PipelineState::Fetching { app_id: "123".into() }.to_string(),
            "fetching app 123"
        );
        assert!(PipelineState::Error(PipelineError::Fetch("boom".into()))
            .to_string()
            .contains("boom"));
    }
}
