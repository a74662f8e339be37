//! # Rating Ledger Shared
//! This crate defines shared data structures and types used across the rating ledger ecosystem.
//! It includes ledger events, query predicates, like statuses, ranking entries and the
//! activity-object identifier conventions.
pub mod types;
