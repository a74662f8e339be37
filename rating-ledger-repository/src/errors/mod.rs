//! Error types for the rating ledger repository.
//! Consolidates and re-exports error types related to ledger and containment operations.
mod containment;
mod ledger;

pub use containment::ContainmentError;
pub use ledger::LedgerError;
