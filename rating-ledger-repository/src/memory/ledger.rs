use async_trait::async_trait;
use rating_ledger_shared::types::{EventOrder, EventPredicate, LedgerEvent, NewEvent, QueryOptions};
use tokio::sync::RwLock;

use crate::{EventLedger, LedgerError};

#[derive(Debug)]
struct LedgerState {
    events: Vec<LedgerEvent>,
    next_id: i64,
}

/// In-memory implementation of the `EventLedger` trait.
///
/// Events are kept in insertion order behind a single lock, so every call is
/// atomic with respect to the others.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState {
                events: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns a snapshot of every stored event in insertion order.
    pub async fn events(&self) -> Vec<LedgerEvent> {
        self.state.read().await.events.clone()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventLedger for InMemoryLedger {
    async fn append(&self, event: &NewEvent) -> Result<i64, LedgerError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;
        state.events.push(event.clone().into_event(id));
        Ok(id)
    }

    async fn query(
        &self,
        predicate: &EventPredicate,
        options: &QueryOptions,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let state = self.state.read().await;
        let mut matching: Vec<LedgerEvent> = state
            .events
            .iter()
            .filter(|event| predicate.matches(event))
            .cloned()
            .collect();

        if options.order == EventOrder::NewestFirst {
            matching.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then(b.id.cmp(&a.id))
            });
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(options.offset).take(limit).collect())
    }

    async fn delete(&self, predicate: &EventPredicate) -> Result<u64, LedgerError> {
        let mut state = self.state.write().await;
        let before = state.events.len();
        state.events.retain(|event| !predicate.matches(event));
        Ok((before - state.events.len()) as u64)
    }

    async fn count(&self, predicate: &EventPredicate) -> Result<u64, LedgerError> {
        let state = self.state.read().await;
        Ok(state.events.iter().filter(|event| predicate.matches(event)).count() as u64)
    }
}
