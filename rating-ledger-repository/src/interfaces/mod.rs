//! This module defines and re-exports the interfaces of the rating ledger repository.
//! It serves as a central point for accessing traits related to data interaction.
mod containment;
mod ledger;

pub use containment::ContainmentResolver;
pub use ledger::EventLedger;
