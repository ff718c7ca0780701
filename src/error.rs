//! Error kinds surfaced by the reconciliation pipeline.

use thiserror::Error;

/// Failure of a pipeline operation.
///
/// Every variant is terminal for the current operation only; the pipeline stays
/// usable and the action can be retried immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// No scraper endpoint is configured.
    #[error("Please configure the scraper endpoint URL (appstore-prices endpoint set <URL>).")]
    Configuration,

    /// User input was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The scraper call failed or returned a non-success status.
    #[error("Failed to fetch app data: {0}")]
    Fetch(String),

    /// The exchange-rate call failed or returned a non-success status.
    #[error("Failed to fetch exchange rates: {0}")]
    RateFetch(String),

    /// The scraper answered, but not with a JSON object.
    #[error("Malformed scraper response: {0}")]
    MalformedPayload(String),
}

impl PipelineError {
    /// True for errors that should stay on screen as a setup prompt rather than a
    /// dismissible message.
    pub fn is_persistent(&self) -> bool {
        matches!(self, PipelineError::Configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_is_persistent() {
        assert!(PipelineError::Configuration.is_persistent());
        assert!(!PipelineError::Validation("x".into()).is_persistent());
        assert!(!PipelineError::Fetch("x".into()).is_persistent());
        assert!(!PipelineError::RateFetch("x".into()).is_persistent());
    }

    #[test]
    fn test_messages_carry_upstream_text() {
        let err = PipelineError::Fetch("Request failed with status: 502 Bad Gateway".into());
        assert!(err.to_string().contains("502 Bad Gateway"));

        let err = PipelineError::Validation("Please enter an App ID.".into());
        assert_eq!(err.to_string(), "Please enter an App ID.");
    }
}
