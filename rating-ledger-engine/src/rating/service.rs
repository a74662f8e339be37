//! Rating service implementation.
//!
//! Records ratings as ledger events and answers every aggregation by querying
//! the ledger; no derived state is kept.
use std::sync::Arc;

use rating_ledger_repository::EventLedger;
use rating_ledger_shared::types::{
    EventPredicate, LedgerEvent, NewEvent, QueryOptions, RATING_VERB_PREFIX, RatedTarget,
};
use tracing::{debug, instrument, warn};

use crate::errors::RatingError;
use crate::ranking::group_by_target;
use crate::rating::{QueryParameters, QueryType};
use crate::rollup::RollupPropagator;

/// The main service for rating activity objects.
///
/// A rating is an event `(actor, rating:<aspect>, target, value)` appended to the
/// ledger. When a rollup propagator is configured, each rating on a document is
/// mirrored into one companion event per rollup container enclosing it. Counts and
/// averages only consider primary events, while cancellations remove companions too.
pub struct RatingService {
    ledger: Arc<dyn EventLedger>,
    rollup: Option<RollupPropagator>,
}

impl RatingService {
    /// Create a new RatingService without rollup propagation.
    pub fn new(ledger: Arc<dyn EventLedger>) -> Self {
        Self {
            ledger,
            rollup: None,
        }
    }

    /// Create a new RatingService propagating document ratings to their containers.
    ///
    /// # Arguments
    ///
    /// * `ledger` - The ledger storing rating events
    /// * `rollup` - The propagator writing companion events; it should share `ledger`
    pub fn with_rollup(ledger: Arc<dyn EventLedger>, rollup: RollupPropagator) -> Self {
        Self {
            ledger,
            rollup: Some(rollup),
        }
    }

    pub fn ledger(&self) -> &Arc<dyn EventLedger> {
        &self.ledger
    }

    fn validate_required(field_name: &str, value: &str) -> Result<(), RatingError> {
        if value.trim().is_empty() {
            return Err(RatingError::validation(format!("{field_name} is required")));
        }
        Ok(())
    }

    /// Records a rating of `target` by `actor` on `aspect`.
    ///
    /// No de-duplication is applied: rating twice stores two events. The like
    /// façade cancels previous likes before calling this.
    ///
    /// # Arguments
    ///
    /// * `actor` - The rating user
    /// * `rating` - The integer rating
    /// * `target` - The rated activity object
    /// * `aspect` - The rated aspect
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The id of the primary event
    /// * `Err(RatingError::ValidationError)` - If actor, target or aspect is blank
    /// * `Err(RatingError)` - If the ledger or the containment lookup fails
    #[instrument(skip_all, fields(actor = %actor, target = %target, aspect = %aspect))]
    pub async fn rate(
        &self,
        actor: &str,
        rating: i64,
        target: &str,
        aspect: &str,
    ) -> Result<i64, RatingError> {
        Self::validate_required("actor", actor)?;
        Self::validate_required("target", target)?;
        Self::validate_required("aspect", aspect)?;

        self.record(NewEvent::rating(actor, aspect, target, rating)).await
    }

    /// Appends a prepared primary rating event and propagates it.
    ///
    /// Lets callers import ratings with their original publication date.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The id of the primary event
    /// * `Err(RatingError::ValidationError)` - If the event is not a primary rating with a target
    pub async fn record(&self, event: NewEvent) -> Result<i64, RatingError> {
        if !event.verb.starts_with(RATING_VERB_PREFIX) {
            return Err(RatingError::validation(format!(
                "{} is not a rating verb",
                event.verb
            )));
        }
        if event.target.is_none() {
            return Err(RatingError::validation("target is required"));
        }
        if event.context.is_some() {
            return Err(RatingError::validation(
                "a primary rating cannot carry a context",
            ));
        }

        let id = self.ledger.append(&event).await?;
        let companions = match &self.rollup {
            Some(rollup) => rollup.propagate(&event).await?.len(),
            None => 0,
        };

        debug!(event_id = id, companions, "Rating recorded");
        Ok(id)
    }

    /// Removes every rating of `actor` on `target` for `aspect`, companions included.
    ///
    /// # Returns
    ///
    /// The number of removed events; zero when the actor never rated the target.
    #[instrument(skip_all, fields(actor = %actor, target = %target, aspect = %aspect))]
    pub async fn cancel_rate(
        &self,
        actor: &str,
        target: &str,
        aspect: &str,
    ) -> Result<u64, RatingError> {
        let params = QueryParameters::new().actor(actor).target(target).aspect(aspect);
        let predicate = QueryType::RatingsForCancel.predicate(&params)?;

        let removed = self.ledger.delete(&predicate).await?;
        debug!(removed, "Ratings cancelled");
        Ok(removed)
    }

    /// Removes every rating on `target` for `aspect`, or for every aspect when `None`.
    #[instrument(skip_all, fields(target = %target, aspect = ?aspect))]
    pub async fn cancel_rates(&self, target: &str, aspect: Option<&str>) -> Result<u64, RatingError> {
        let mut params = QueryParameters::new().target(target);
        params.aspect = aspect.map(str::to_string);
        let predicate = QueryType::RatingsForCancel.predicate(&params)?;

        let removed = self.ledger.delete(&predicate).await?;
        debug!(removed, "Ratings cancelled");
        Ok(removed)
    }

    /// Removes every rating of every aspect on a set of targets in one deletion.
    ///
    /// Used when activities are removed together with their replies.
    #[instrument(skip_all, fields(targets = targets.len()))]
    pub async fn purge_targets(&self, targets: &[String]) -> Result<u64, RatingError> {
        if targets.is_empty() {
            return Ok(0);
        }

        let predicate = EventPredicate::new()
            .with_verb_prefix(RATING_VERB_PREFIX)
            .with_targets(targets.to_vec());

        let removed = self.ledger.delete(&predicate).await?;
        debug!(removed, "Ratings purged");
        Ok(removed)
    }

    pub async fn has_user_rated(
        &self,
        actor: &str,
        target: &str,
        aspect: &str,
    ) -> Result<bool, RatingError> {
        Ok(self.get_rates_count_for_user(actor, target, aspect).await? > 0)
    }

    pub async fn get_rates_count(&self, target: &str, aspect: &str) -> Result<u64, RatingError> {
        let params = QueryParameters::new().target(target).aspect(aspect);
        self.count(QueryType::RatingsForObject, &params).await
    }

    pub async fn get_rates_count_with_value(
        &self,
        target: &str,
        rating: i64,
        aspect: &str,
    ) -> Result<u64, RatingError> {
        let params = QueryParameters::new().target(target).aspect(aspect).rating(rating);
        self.count(QueryType::RatingsForObject, &params).await
    }

    pub async fn get_rates_count_for_user(
        &self,
        actor: &str,
        target: &str,
        aspect: &str,
    ) -> Result<u64, RatingError> {
        let params = QueryParameters::new().actor(actor).target(target).aspect(aspect);
        self.count(QueryType::ActorRatingsForObject, &params).await
    }

    pub async fn get_rates_count_for_user_with_value(
        &self,
        actor: &str,
        target: &str,
        rating: i64,
        aspect: &str,
    ) -> Result<u64, RatingError> {
        let params = QueryParameters::new()
            .actor(actor)
            .target(target)
            .aspect(aspect)
            .rating(rating);
        self.count(QueryType::ActorRatingsForObject, &params).await
    }

    /// Arithmetic mean of the primary ratings on `target` for `aspect`.
    ///
    /// # Returns
    ///
    /// `0.0` when there is no rating. Malformed stored values count in the
    /// denominator but contribute nothing to the sum.
    pub async fn get_average_rating(&self, target: &str, aspect: &str) -> Result<f64, RatingError> {
        let params = QueryParameters::new().target(target).aspect(aspect);
        let events = self
            .execute(QueryType::RatingsForObject, &params, &QueryOptions::default())
            .await?;
        Ok(compute_average(&events))
    }

    /// Arithmetic mean of the primary ratings of `actor` on `target` for `aspect`.
    pub async fn get_average_rating_for_user(
        &self,
        actor: &str,
        target: &str,
        aspect: &str,
    ) -> Result<f64, RatingError> {
        let params = QueryParameters::new().actor(actor).target(target).aspect(aspect);
        let events = self
            .execute(QueryType::ActorRatingsForObject, &params, &QueryOptions::default())
            .await?;
        Ok(compute_average(&events))
    }

    /// Targets rated with `rating` on `aspect` inside the rollup container `context`.
    ///
    /// # Returns
    ///
    /// One entry per distinct target with its number of matching companion events,
    /// highest score first, ties broken by the oldest event.
    pub async fn get_rated_children(
        &self,
        context: &str,
        rating: i64,
        aspect: &str,
    ) -> Result<Vec<RatedTarget>, RatingError> {
        let params = QueryParameters::new()
            .context(context)
            .aspect(aspect)
            .rating(rating);
        let events = self
            .execute(QueryType::RatedChildrenForContext, &params, &QueryOptions::default())
            .await?;
        Ok(group_by_target(&events))
    }

    /// Documents most recently rated by `actor` on `aspect`, newest first.
    ///
    /// A `limit` of `0` returns every rated document.
    pub async fn get_latest_rated_by_user(
        &self,
        actor: &str,
        aspect: &str,
        limit: usize,
    ) -> Result<Vec<String>, RatingError> {
        let params = QueryParameters::new().actor(actor).aspect(aspect);
        let options = match limit {
            0 => QueryOptions::default().newest_first(),
            limit => QueryOptions::limited(limit).newest_first(),
        };
        let events = self
            .execute(QueryType::LatestRatedForObject, &params, &options)
            .await?;
        Ok(events.into_iter().filter_map(|event| event.target).collect())
    }

    /// Runs a named query and returns the matching events.
    ///
    /// # Arguments
    ///
    /// * `query` - The query type, see [`QueryType`]
    /// * `params` - The query parameters
    /// * `options` - Ordering and pagination of the result
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<LedgerEvent>)` - The matching events
    /// * `Err(RatingError::MissingParameter)` - If the query lacks a required parameter
    /// * `Err(RatingError::Ledger)` - If the ledger query fails
    pub async fn execute(
        &self,
        query: QueryType,
        params: &QueryParameters,
        options: &QueryOptions,
    ) -> Result<Vec<LedgerEvent>, RatingError> {
        let predicate = query.predicate(params)?;
        Ok(self.ledger.query(&predicate, options).await?)
    }

    async fn count(&self, query: QueryType, params: &QueryParameters) -> Result<u64, RatingError> {
        let predicate = query.predicate(params)?;
        Ok(self.ledger.count(&predicate).await?)
    }
}

fn compute_average(events: &[LedgerEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }

    let total: i64 = events
        .iter()
        .filter_map(|event| match event.rating() {
            Some(rating) => Some(rating),
            None => {
                warn!(event_id = event.id, value = %event.value, "Ignoring malformed rating value");
                None
            }
        })
        .sum();

    total as f64 / events.len() as f64
}
