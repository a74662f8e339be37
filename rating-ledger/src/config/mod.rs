//! Configuration and dependency wiring of the rating ledger service.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ConnectionMode, Settings};
