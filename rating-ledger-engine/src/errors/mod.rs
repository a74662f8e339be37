//! Error types for the rating ledger engine.
mod rating;

pub use rating::RatingError;
