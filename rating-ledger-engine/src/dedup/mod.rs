//! De-duplication of single-active rating aspects.
//!
//! Two concurrent likes by the same user may both cancel before either inserts,
//! leaving two active ratings. This pass keeps only the newest event of every
//! `(actor, target, context)` group of an aspect.
use std::collections::HashMap;
use std::sync::Arc;

use rating_ledger_repository::EventLedger;
use rating_ledger_shared::types::{EventPredicate, QueryOptions, rating_verb};
use tracing::{info, instrument};

use crate::errors::RatingError;

/// Outcome of a de-duplication pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DedupReport {
    /// Number of events of the aspect examined.
    pub scanned: usize,
    /// Number of superseded events removed.
    pub removed: u64,
}

pub struct Deduplicator {
    ledger: Arc<dyn EventLedger>,
}

impl Deduplicator {
    pub fn new(ledger: Arc<dyn EventLedger>) -> Self {
        Self { ledger }
    }

    /// Removes superseded ratings of an aspect where only one rating per user may be active.
    ///
    /// Must not be run on aspects that allow several ratings per user.
    ///
    /// # Arguments
    ///
    /// * `aspect` - The single-active aspect, e.g. `like`
    ///
    /// # Returns
    ///
    /// A `DedupReport` with the number of scanned and removed events.
    #[instrument(skip(self))]
    pub async fn run(&self, aspect: &str) -> Result<DedupReport, RatingError> {
        let predicate = EventPredicate::new().with_verb(rating_verb(aspect));
        let events = self.ledger.query(&predicate, &QueryOptions::default()).await?;

        let mut latest: HashMap<(&str, Option<&str>, Option<&str>), i64> = HashMap::new();
        for event in &events {
            let key = (
                event.actor.as_str(),
                event.target.as_deref(),
                event.context.as_deref(),
            );
            let newest = latest.entry(key).or_insert(event.id);
            *newest = (*newest).max(event.id);
        }

        let stale: Vec<i64> = events
            .iter()
            .filter(|event| {
                let key = (
                    event.actor.as_str(),
                    event.target.as_deref(),
                    event.context.as_deref(),
                );
                latest.get(&key).is_some_and(|newest| *newest != event.id)
            })
            .map(|event| event.id)
            .collect();

        let removed = if stale.is_empty() {
            0
        } else {
            self.ledger
                .delete(&EventPredicate::new().with_ids(stale))
                .await?
        };

        let report = DedupReport {
            scanned: events.len(),
            removed,
        };
        info!(scanned = report.scanned, removed = report.removed, "De-duplication pass completed");
        Ok(report)
    }
}
