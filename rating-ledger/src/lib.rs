//! Rating Ledger Library
//!
//! This library wires the rating ledger service: configuration from the
//! environment, dependency initialisation, error handling and the periodic
//! de-duplication worker.

pub mod config;
pub mod errors;
pub mod worker;

pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::ServiceError;
pub use worker::DedupWorker;
