//! Container rollup of document ratings.
use std::sync::Arc;

use rating_ledger_repository::{ContainmentResolver, EventLedger};
use rating_ledger_shared::types::{NewEvent, TargetKind};
use tracing::{debug, instrument};

use crate::errors::RatingError;

/// Mirrors primary document ratings into their rollup containers.
///
/// For each ancestor flagged as a rollup container, a companion event is appended
/// with the same actor, verb, target, value and date as the primary, and the
/// container as context. Companions are what container-scoped rankings count.
pub struct RollupPropagator {
    ledger: Arc<dyn EventLedger>,
    containment: Arc<dyn ContainmentResolver>,
}

impl RollupPropagator {
    pub fn new(ledger: Arc<dyn EventLedger>, containment: Arc<dyn ContainmentResolver>) -> Self {
        Self { ledger, containment }
    }

    /// Appends the companion events of a primary rating.
    ///
    /// # Arguments
    ///
    /// * `primary` - The primary rating just appended
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<i64>)` - Ids of the companions, nearest container first; empty for
    ///   non-document targets or events that already carry a context
    /// * `Err(RatingError)` - If resolving containers or appending fails; companions
    ///   appended before the failure are kept
    #[instrument(skip_all, fields(target = ?primary.target))]
    pub async fn propagate(&self, primary: &NewEvent) -> Result<Vec<i64>, RatingError> {
        let Some(target) = primary.target.as_deref() else {
            return Ok(Vec::new());
        };
        if primary.context.is_some() || !TargetKind::of(target).is_containable() {
            return Ok(Vec::new());
        }

        let containers = self.containment.rollup_ancestors(target).await?;
        let mut ids = Vec::with_capacity(containers.len());
        for container in containers {
            ids.push(self.ledger.append(&primary.companion_in(container)).await?);
        }

        debug!(companions = ids.len(), "Rating rolled up");
        Ok(ids)
    }
}
