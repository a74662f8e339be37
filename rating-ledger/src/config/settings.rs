//! Service settings read from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::errors::ServiceError;

/// Default maximum number of pooled database connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default interval between two de-duplication passes in seconds.
const DEFAULT_DEDUP_INTERVAL_SECS: u64 = 300;

/// Connection mode for the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every retry interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from the `DB_CONNECTION_MODE` environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        match env::var("DB_CONNECTION_MODE")
            .unwrap_or_else(|_| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid DB_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings of the rating ledger service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub dedup_interval: Duration,
}

impl Settings {
    /// Reads the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection URL (required)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
    /// - `DB_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `DB_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `DEDUP_INTERVAL_SECS`: Interval between de-duplication passes in seconds (default: 300)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - The parsed settings
    /// * `Err(ServiceError::Config)` - If `DATABASE_URL` is missing or an interval is zero
    pub fn from_env() -> Result<Self, ServiceError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ServiceError::config("DATABASE_URL must be set"))?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let retry_interval = parse_or("DB_RETRY_INTERVAL_SECS", DEFAULT_RETRY_INTERVAL_SECS);
        let dedup_interval = parse_or("DEDUP_INTERVAL_SECS", DEFAULT_DEDUP_INTERVAL_SECS);

        if dedup_interval == 0 {
            return Err(ServiceError::config("DEDUP_INTERVAL_SECS must be positive"));
        }

        Ok(Self {
            database_url,
            max_connections,
            connection_mode: ConnectionMode::from_env(),
            retry_interval: Duration::from_secs(retry_interval),
            dedup_interval: Duration::from_secs(dedup_interval),
        })
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn parse_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
