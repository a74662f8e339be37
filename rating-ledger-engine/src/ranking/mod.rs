//! Most-liked ranking of documents and posts within a container.
//!
//! Documents are ranked from the like companions written by rollup into the
//! container. Posts are ranked from the primary likes on the short messages
//! published in the container. Both rankings are merged into one list.
mod grouping;

use std::collections::HashSet;
use std::sync::Arc;

use rating_ledger_repository::EventLedger;
use rating_ledger_shared::types::{
    DateWindow, EventPredicate, LIKE_ASPECT, LIKE_RATING, QueryOptions, RankedEntry, TargetKind,
    activity_object, rating_verb,
};
use tracing::debug;

use crate::config::RankingConfig;
use crate::errors::RatingError;

pub(crate) use grouping::group_by_target;

/// A most-liked ranking request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MostLikedRequest {
    /// The container the ranked documents and posts belong to.
    pub scope: String,
    /// Maximum number of entries returned.
    pub limit: usize,
    /// Only likes published within this window are counted.
    pub window: Option<DateWindow>,
    /// When set, each entry tells whether this user liked it.
    pub caller: Option<String>,
}

impl MostLikedRequest {
    pub fn new(scope: impl Into<String>, limit: usize) -> Self {
        Self {
            scope: scope.into(),
            limit,
            window: None,
            caller: None,
        }
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn for_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }
}

/// Computes most-liked rankings from the ledger.
pub struct MostLikedRanker {
    ledger: Arc<dyn EventLedger>,
    config: RankingConfig,
}

impl MostLikedRanker {
    pub fn new(ledger: Arc<dyn EventLedger>) -> Self {
        Self::with_config(ledger, RankingConfig::default())
    }

    pub fn with_config(ledger: Arc<dyn EventLedger>, config: RankingConfig) -> Self {
        Self { ledger, config }
    }

    fn validate(&self, request: &MostLikedRequest) -> Result<(), RatingError> {
        if request.scope.trim().is_empty() {
            return Err(RatingError::validation("scope is required"));
        }
        if let Some(max) = self.config.max_limit {
            if request.limit > max {
                return Err(RatingError::limit_exceeded(request.limit, max));
            }
        }
        if let Some(window) = request.window {
            if !window.is_valid() {
                return Err(RatingError::InvalidWindow {
                    from: window.from,
                    to: window.to,
                });
            }
        }
        Ok(())
    }

    /// Ranks the documents and posts of a container by like count.
    ///
    /// # Arguments
    ///
    /// * `request` - Scope, limit, optional date window and optional caller
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RankedEntry>)` - At most `limit` entries, highest score first,
    ///   ties broken by the oldest like
    /// * `Err(RatingError::LimitExceeded)` - If a cap is configured and the limit exceeds it
    /// * `Err(RatingError::InvalidWindow)` - If the window ends before it starts
    /// * `Err(RatingError::Ledger)` - If a ledger query fails
    pub async fn most_liked(&self, request: &MostLikedRequest) -> Result<Vec<RankedEntry>, RatingError> {
        self.validate(request)?;
        if request.limit == 0 {
            return Ok(Vec::new());
        }

        let mut entries = self.rank_documents(request).await?;
        entries.extend(self.rank_posts(request).await?);

        entries.sort_by(RankedEntry::rank_order);
        entries.truncate(request.limit);

        debug!(scope = %request.scope, entries = entries.len(), "Most liked ranking computed");
        Ok(entries)
    }

    async fn rank_documents(&self, request: &MostLikedRequest) -> Result<Vec<RankedEntry>, RatingError> {
        let predicate = Self::likes()
            .with_context(request.scope.as_str())
            .published_within(request.window);

        self.rank(predicate, request.caller.as_deref(), TargetKind::Document)
            .await
    }

    async fn rank_posts(&self, request: &MostLikedRequest) -> Result<Vec<RankedEntry>, RatingError> {
        let posts_predicate = EventPredicate::new()
            .with_verb(self.config.post_verb.as_str())
            .with_context(request.scope.as_str());
        let posts = self
            .ledger
            .query(&posts_predicate, &QueryOptions::default())
            .await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let targets = posts.iter().map(|post| activity_object(post.id)).collect();
        let predicate = Self::likes()
            .with_targets(targets)
            .primary()
            .published_within(request.window);

        self.rank(predicate, request.caller.as_deref(), TargetKind::Post)
            .await
    }

    fn likes() -> EventPredicate {
        EventPredicate::new()
            .with_verb(rating_verb(LIKE_ASPECT))
            .with_value(LIKE_RATING.to_string())
    }

    /// Groups the liked targets and flags those the caller liked under the same predicate.
    async fn rank(
        &self,
        predicate: EventPredicate,
        caller: Option<&str>,
        kind: TargetKind,
    ) -> Result<Vec<RankedEntry>, RatingError> {
        let events = self.ledger.query(&predicate, &QueryOptions::default()).await?;
        let rated = group_by_target(&events);
        if rated.is_empty() {
            return Ok(Vec::new());
        }

        let liked_by_caller: HashSet<String> = match caller {
            Some(caller) => self
                .ledger
                .query(&predicate.with_actor(caller), &QueryOptions::default())
                .await?
                .into_iter()
                .filter_map(|event| event.target)
                .collect(),
            None => HashSet::new(),
        };

        Ok(rated
            .into_iter()
            .map(|target| {
                let caller_has_rated = liked_by_caller.contains(&target.target);
                RankedEntry::from_rated(target, kind, caller_has_rated)
            })
            .collect())
    }
}
