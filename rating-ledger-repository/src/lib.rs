//! # Rating Ledger Repository
//! This crate provides traits and implementations for interacting with the
//! activity ledger and the containment hierarchy. It includes definitions for
//! errors, interfaces, in-memory implementations and a PostgreSQL ledger.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{ContainmentError, LedgerError};
pub use interfaces::{ContainmentResolver, EventLedger};
pub use memory::{InMemoryContainment, InMemoryLedger};
pub use postgres::{MIGRATOR, PostgresLedger};
