//! Dependency initialization and wiring for the rating ledger service.

use std::sync::Arc;
use std::time::Duration;

use rating_ledger_engine::Deduplicator;
use rating_ledger_repository::{EventLedger, MIGRATOR, PostgresLedger};
use sqlx::postgres::PgPoolOptions;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{ConnectionMode, Settings};
use crate::errors::ServiceError;
use crate::worker::DedupWorker;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The PostgreSQL ledger shared by every component.
    pub ledger: Arc<dyn EventLedger>,
    /// The de-duplication worker ready to run.
    pub worker: DedupWorker,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// Connects to PostgreSQL (retrying according to the connection mode),
    /// applies the embedded migrations and builds the ledger and the worker.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails (connection errors only in fail-fast mode)
    pub async fn new(settings: &Settings) -> Result<Self, ServiceError> {
        info!(
            max_connections = settings.max_connections,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            dedup_interval_secs = settings.dedup_interval.as_secs(),
            "Initializing dependencies"
        );

        let pool = Self::connect_to_database(
            &settings.database_url,
            settings.max_connections,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("Database connection established");

        MIGRATOR.run(&pool).await?;

        info!("Database migrations applied");

        let ledger: Arc<dyn EventLedger> = Arc::new(PostgresLedger::new(pool).await?);
        let worker = DedupWorker::new(Deduplicator::new(ledger.clone()), settings.dedup_interval);

        Ok(Self { ledger, worker })
    }

    /// Connect to the database with retry logic based on connection mode.
    async fn connect_to_database(
        url: &str,
        max_connections: u32,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<sqlx::PgPool, ServiceError> {
        loop {
            match PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await
            {
                Ok(pool) => return Ok(pool),
                Err(e) => match mode {
                    ConnectionMode::FailFast => return Err(ServiceError::Database(e)),
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to the database, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
