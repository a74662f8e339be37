//! Error types for the rating ledger service.
//! Consolidates errors from configuration, the database and the engine.
use rating_ledger_engine::RatingError;
use rating_ledger_repository::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Rating error: {0}")]
    Rating(#[from] RatingError),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
