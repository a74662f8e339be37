//! In-memory implementations of the repository interfaces.
//!
//! Used by tests and by embedders that do not need persistence.
mod containment;
mod ledger;

pub use containment::InMemoryContainment;
pub use ledger::InMemoryLedger;
