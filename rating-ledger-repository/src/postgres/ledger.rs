//! PostgreSQL implementation of the activity ledger.
//!
//! Provides a PostgreSQL backend for the `EventLedger` trait. Predicates are
//! translated to SQL with `QueryBuilder`, binding every value.
//!
//! ## Database Tables
//!
//! - `ledger_events`: Every activity, ratings and their rollup companions included
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rating_ledger_shared::types::{
    ContextMatch, EventOrder, EventPredicate, LedgerEvent, NewEvent, QueryOptions, TargetMatch,
    VerbMatch,
};
use sqlx::{Postgres, QueryBuilder};

use crate::{EventLedger, LedgerError};

const SELECT_EVENTS: &str =
    "SELECT id, actor, verb, target, value, context, published_at FROM ledger_events";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    actor: String,
    verb: String,
    target: Option<String>,
    value: String,
    context: Option<String>,
    published_at: DateTime<Utc>,
}

impl From<EventRow> for LedgerEvent {
    fn from(row: EventRow) -> Self {
        LedgerEvent {
            id: row.id,
            actor: row.actor,
            verb: row.verb,
            target: row.target,
            value: row.value,
            context: row.context,
            published_at: row.published_at,
        }
    }
}

/// PostgreSQL implementation of the activity ledger.
///
/// Provides database operations for ledger events using a `sqlx::PgPool`.
pub struct PostgresLedger {
    pool: sqlx::PgPool,
}

impl PostgresLedger {
    /// Creates a new PostgreSQL ledger instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the `ledger_events` schema
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresLedger)` - Ready-to-use ledger instance
    /// * `Err(LedgerError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, LedgerError> {
        Ok(Self { pool })
    }
}

/// Escapes `LIKE` wildcards so a prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Appends the `WHERE` clause of a predicate to a query.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &EventPredicate) {
    builder.push(" WHERE TRUE");

    match &predicate.verb {
        Some(VerbMatch::Exact(verb)) => {
            builder.push(" AND verb = ").push_bind(verb.clone());
        }
        Some(VerbMatch::Prefix(prefix)) => {
            builder
                .push(" AND verb LIKE ")
                .push_bind(like_prefix(prefix))
                .push(" ESCAPE '\\'");
        }
        None => {}
    }

    if let Some(actor) = &predicate.actor {
        builder.push(" AND actor = ").push_bind(actor.clone());
    }

    match &predicate.target {
        Some(TargetMatch::Exact(target)) => {
            builder.push(" AND target = ").push_bind(target.clone());
        }
        Some(TargetMatch::Prefix(prefix)) => {
            builder
                .push(" AND target LIKE ")
                .push_bind(like_prefix(prefix))
                .push(" ESCAPE '\\'");
        }
        Some(TargetMatch::AnyOf(targets)) => {
            builder
                .push(" AND target = ANY(")
                .push_bind(targets.clone())
                .push(")");
        }
        None => {}
    }

    match &predicate.context {
        Some(ContextMatch::Primary) => {
            builder.push(" AND context IS NULL");
        }
        Some(ContextMatch::Exact(context)) => {
            builder.push(" AND context = ").push_bind(context.clone());
        }
        None => {}
    }

    if let Some(value) = &predicate.value {
        builder.push(" AND value = ").push_bind(value.clone());
    }

    if let Some(window) = &predicate.published {
        builder
            .push(" AND published_at BETWEEN ")
            .push_bind(window.from)
            .push(" AND ")
            .push_bind(window.to);
    }

    if let Some(ids) = &predicate.ids {
        builder.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
    }
}

fn to_sql_bound(value: usize, what: &str) -> Result<i64, LedgerError> {
    i64::try_from(value).map_err(|_| LedgerError::InvalidRecord(format!("{what} out of range: {value}")))
}

#[async_trait]
impl EventLedger for PostgresLedger {
    /// Inserts an event and returns the id assigned by the `BIGSERIAL` sequence.
    async fn append(&self, event: &NewEvent) -> Result<i64, LedgerError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ledger_events (actor, verb, target, value, context, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&event.actor)
        .bind(&event.verb)
        .bind(&event.target)
        .bind(&event.value)
        .bind(&event.context)
        .bind(event.published_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Selects the matching events.
    ///
    /// # Arguments
    ///
    /// * `predicate` - Filters translated into the `WHERE` clause
    /// * `options` - `ORDER BY`, `LIMIT` and `OFFSET` of the query
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<LedgerEvent>)` - Matching events (empty if none found)
    /// * `Err(LedgerError)` - Database query failure
    async fn query(
        &self,
        predicate: &EventPredicate,
        options: &QueryOptions,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let mut query_builder = QueryBuilder::new(SELECT_EVENTS);
        push_predicate(&mut query_builder, predicate);

        query_builder.push(match options.order {
            EventOrder::Insertion => " ORDER BY id ASC",
            EventOrder::NewestFirst => " ORDER BY published_at DESC, id DESC",
        });
        if let Some(limit) = options.limit {
            query_builder
                .push(" LIMIT ")
                .push_bind(to_sql_bound(limit, "limit")?);
        }
        if options.offset > 0 {
            query_builder
                .push(" OFFSET ")
                .push_bind(to_sql_bound(options.offset, "offset")?);
        }

        let rows = query_builder
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LedgerEvent::from).collect())
    }

    async fn delete(&self, predicate: &EventPredicate) -> Result<u64, LedgerError> {
        let mut query_builder = QueryBuilder::new("DELETE FROM ledger_events");
        push_predicate(&mut query_builder, predicate);

        let result = query_builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, predicate: &EventPredicate) -> Result<u64, LedgerError> {
        let mut query_builder = QueryBuilder::new("SELECT COUNT(*) FROM ledger_events");
        push_predicate(&mut query_builder, predicate);

        let count: i64 = query_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|_| LedgerError::InvalidRecord(format!("negative count: {count}")))
    }
}
