//! Periodic de-duplication of like ratings.

use std::future::Future;
use std::time::Duration;

use rating_ledger_engine::{DedupReport, Deduplicator};
use rating_ledger_shared::types::LIKE_ASPECT;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;

/// Runs the like de-duplication pass on a fixed interval until shutdown.
pub struct DedupWorker {
    deduplicator: Deduplicator,
    interval: Duration,
}

impl DedupWorker {
    pub fn new(deduplicator: Deduplicator, interval: Duration) -> Self {
        Self {
            deduplicator,
            interval,
        }
    }

    /// Runs a single pass over the like aspect.
    pub async fn run_once(&self) -> Result<DedupReport, ServiceError> {
        Ok(self.deduplicator.run(LIKE_ASPECT).await?)
    }

    /// Runs passes until `shutdown` resolves.
    ///
    /// The first pass starts immediately. A failing pass is logged and the next
    /// one runs at the following tick.
    ///
    /// # Returns
    ///
    /// The number of passes that completed successfully.
    #[instrument(skip_all, fields(interval_secs = self.interval.as_secs()))]
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<u64, ServiceError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut completed = 0;
        info!("De-duplication worker started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(completed, "Received shutdown signal");
                    return Ok(completed);
                }
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(_) => completed += 1,
                        Err(e) => error!(error = %e, "De-duplication pass failed"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_ledger_repository::{EventLedger, InMemoryLedger};
    use rating_ledger_shared::types::NewEvent;
    use std::sync::Arc;

    async fn duplicated_likes() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        for _ in 0..3 {
            ledger
                .append(&NewEvent::rating("robin", LIKE_ASPECT, "doc:default:1", 1))
                .await
                .unwrap();
        }
        ledger
    }

    #[tokio::test]
    async fn test_run_once_removes_duplicates() {
        let ledger = duplicated_likes().await;
        let worker = DedupWorker::new(Deduplicator::new(ledger.clone()), Duration::from_secs(60));

        let report = worker.run_once().await.unwrap();

        assert_eq!(report.scanned, 3);
        assert_eq!(report.removed, 2);
        assert_eq!(ledger.events().await.len(), 1);
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let ledger = duplicated_likes().await;
        let worker = DedupWorker::new(Deduplicator::new(ledger.clone()), Duration::from_secs(60));

        let completed = worker.run_until(std::future::ready(())).await.unwrap();

        assert_eq!(completed, 0);
        assert_eq!(ledger.events().await.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_runs_passes_on_each_tick() {
        let ledger = duplicated_likes().await;
        let worker = DedupWorker::new(Deduplicator::new(ledger.clone()), Duration::from_secs(60));

        let shutdown = tokio::time::sleep(Duration::from_secs(150));
        let completed = worker.run_until(shutdown).await.unwrap();

        assert_eq!(completed, 3);
        assert_eq!(ledger.events().await.len(), 1);
    }
}
