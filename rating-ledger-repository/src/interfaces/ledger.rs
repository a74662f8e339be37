//! This module defines the `EventLedger` trait, the append-only activity store
//! every rating operation reads from and writes to.
use rating_ledger_shared::types::{EventPredicate, LedgerEvent, NewEvent, QueryOptions};

use crate::errors::LedgerError;

/// A trait that defines the interface for interacting with the activity ledger.
///
/// Implementors store events, answer predicate queries and delete matching events.
/// Each single call is atomic; nothing is promised across calls.
#[async_trait::async_trait]
pub trait EventLedger: Send + Sync {
    /// Appends an event to the ledger.
    ///
    /// # Arguments
    ///
    /// * `event` - The event to store
    ///
    /// # Returns
    ///
    /// The id assigned to the event, strictly greater than every id assigned before it,
    /// or a `LedgerError` if the write fails.
    async fn append(&self, event: &NewEvent) -> Result<i64, LedgerError>;

    /// Returns the events matching a predicate.
    ///
    /// # Arguments
    ///
    /// * `predicate` - Conjunction of filters the events must satisfy
    /// * `options` - Ordering, offset and limit of the result
    ///
    /// # Returns
    ///
    /// The matching events (empty if none), or a `LedgerError` if the query fails.
    async fn query(
        &self,
        predicate: &EventPredicate,
        options: &QueryOptions,
    ) -> Result<Vec<LedgerEvent>, LedgerError>;

    /// Removes every event matching a predicate.
    ///
    /// # Arguments
    ///
    /// * `predicate` - Conjunction of filters selecting the events to remove
    ///
    /// # Returns
    ///
    /// The number of removed events, or a `LedgerError` if the deletion fails.
    async fn delete(&self, predicate: &EventPredicate) -> Result<u64, LedgerError>;

    /// Counts the events matching a predicate.
    ///
    /// The default implementation loads the matching events; backends able to
    /// count natively should override it.
    async fn count(&self, predicate: &EventPredicate) -> Result<u64, LedgerError> {
        let events = self.query(predicate, &QueryOptions::default()).await?;
        Ok(events.len() as u64)
    }
}
