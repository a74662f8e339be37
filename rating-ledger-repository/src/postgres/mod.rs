//! PostgreSQL implementation of the rating ledger repository.
mod ledger;

pub use ledger::PostgresLedger;

/// Embedded schema migrations of the `ledger_events` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");
