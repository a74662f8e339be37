//! Error types returned by every engine operation.
use chrono::{DateTime, Utc};
use rating_ledger_repository::{ContainmentError, LedgerError};
use thiserror::Error;

/// Represents errors that can occur while rating, querying or ranking.
///
/// Ledger and containment failures are propagated unchanged; the remaining
/// variants reject invalid requests before the ledger is touched.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Containment error: {0}")]
    Containment(#[from] ContainmentError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported query type: {0}")]
    UnsupportedQuery(String),

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid date window: {from} is after {to}")]
    InvalidWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Limit {provided} exceeds maximum allowed {max}")]
    LimitExceeded { provided: usize, max: usize },
}

impl RatingError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a limit exceeded error.
    pub fn limit_exceeded(provided: usize, max: usize) -> Self {
        Self::LimitExceeded { provided, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RatingError::validation("actor is required").to_string(),
            "Validation error: actor is required"
        );
        assert_eq!(
            RatingError::limit_exceeded(5000, 1000).to_string(),
            "Limit 5000 exceeds maximum allowed 1000"
        );
        assert_eq!(
            RatingError::MissingParameter("target").to_string(),
            "Missing query parameter: target"
        );
    }

    #[test]
    fn test_ledger_error_conversion() {
        let error: RatingError = LedgerError::Unavailable("down".to_string()).into();
        assert!(matches!(error, RatingError::Ledger(_)));
    }
}
