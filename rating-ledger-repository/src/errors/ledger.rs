//! Error types for the activity ledger.
use thiserror::Error;

/// Represents errors that can occur within an event ledger.
///
/// This enum consolidates the failure modes of ledger backends, such as
/// SQLx errors during database operations or rows that cannot be mapped back
/// to ledger events.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}
