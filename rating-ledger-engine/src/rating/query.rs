//! Named rating queries.
//!
//! Every aggregation of [`RatingService`](super::RatingService) is expressed as one
//! of these query types, turned into an [`EventPredicate`] by
//! [`QueryType::predicate`]. The same query types can be run by name through
//! [`RatingService::execute`](super::RatingService::execute).
use std::fmt;
use std::str::FromStr;

use rating_ledger_shared::types::{DOCUMENT_PREFIX, EventPredicate, RATING_VERB_PREFIX, rating_verb};

use crate::errors::RatingError;

/// The rating queries the ledger can answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Primary ratings of one actor on one target.
    ActorRatingsForObject,
    /// Primary ratings on one target.
    RatingsForObject,
    /// Ratings scoped to a container (rollup companions).
    RatedChildrenForContext,
    /// Ratings to remove when cancelling, companions included.
    RatingsForCancel,
    /// Primary ratings of one actor on documents.
    LatestRatedForObject,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryType::ActorRatingsForObject => "actor_ratings_for_object",
            QueryType::RatingsForObject => "ratings_for_object",
            QueryType::RatedChildrenForContext => "rated_children_for_context",
            QueryType::RatingsForCancel => "ratings_for_cancel",
            QueryType::LatestRatedForObject => "latest_rated_for_object",
        }
    }

    /// Builds the ledger predicate of this query.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameters of the query; which ones are required depends on the type
    ///
    /// # Returns
    ///
    /// * `Ok(EventPredicate)` - The predicate selecting the events of the query
    /// * `Err(RatingError::MissingParameter)` - If a required parameter is absent
    pub fn predicate(self, params: &QueryParameters) -> Result<EventPredicate, RatingError> {
        let predicate = match self {
            QueryType::ActorRatingsForObject => EventPredicate::new()
                .with_verb(rating_verb(params.require_aspect()?))
                .with_actor(params.require_actor()?)
                .with_target(params.require_target()?)
                .primary(),
            QueryType::RatingsForObject => EventPredicate::new()
                .with_verb(rating_verb(params.require_aspect()?))
                .with_target(params.require_target()?)
                .primary(),
            QueryType::RatedChildrenForContext => EventPredicate::new()
                .with_verb(rating_verb(params.require_aspect()?))
                .with_context(params.require_context()?),
            QueryType::RatingsForCancel => {
                let predicate = EventPredicate::new().with_target(params.require_target()?);
                let predicate = match params.aspect.as_deref() {
                    Some(aspect) => predicate.with_verb(rating_verb(aspect)),
                    None => predicate.with_verb_prefix(RATING_VERB_PREFIX),
                };
                match params.actor.as_deref() {
                    Some(actor) => predicate.with_actor(actor),
                    None => predicate,
                }
            }
            QueryType::LatestRatedForObject => EventPredicate::new()
                .with_verb(rating_verb(params.require_aspect()?))
                .with_actor(params.require_actor()?)
                .with_target_prefix(DOCUMENT_PREFIX)
                .primary(),
        };

        Ok(match params.rating {
            Some(rating) => predicate.with_value(rating.to_string()),
            None => predicate,
        })
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor_ratings_for_object" => Ok(QueryType::ActorRatingsForObject),
            "ratings_for_object" => Ok(QueryType::RatingsForObject),
            "rated_children_for_context" => Ok(QueryType::RatedChildrenForContext),
            "ratings_for_cancel" => Ok(QueryType::RatingsForCancel),
            "latest_rated_for_object" => Ok(QueryType::LatestRatedForObject),
            other => Err(RatingError::UnsupportedQuery(other.to_string())),
        }
    }
}

/// Parameters of a named rating query. Unset parameters are not filtered on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pub target: Option<String>,
    pub aspect: Option<String>,
    pub actor: Option<String>,
    pub rating: Option<i64>,
    pub context: Option<String>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn aspect(mut self, aspect: impl Into<String>) -> Self {
        self.aspect = Some(aspect.into());
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn require_target(&self) -> Result<&str, RatingError> {
        self.target.as_deref().ok_or(RatingError::MissingParameter("target"))
    }

    fn require_aspect(&self) -> Result<&str, RatingError> {
        self.aspect.as_deref().ok_or(RatingError::MissingParameter("aspect"))
    }

    fn require_actor(&self) -> Result<&str, RatingError> {
        self.actor.as_deref().ok_or(RatingError::MissingParameter("actor"))
    }

    fn require_context(&self) -> Result<&str, RatingError> {
        self.context.as_deref().ok_or(RatingError::MissingParameter("context"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_ledger_shared::types::{ContextMatch, TargetMatch, VerbMatch};

    #[test]
    fn test_query_type_names_round_trip() {
        for query in [
            QueryType::ActorRatingsForObject,
            QueryType::RatingsForObject,
            QueryType::RatedChildrenForContext,
            QueryType::RatingsForCancel,
            QueryType::LatestRatedForObject,
        ] {
            assert_eq!(query.as_str().parse::<QueryType>().unwrap(), query);
        }
    }

    #[test]
    fn test_unknown_query_type() {
        let result = "most_rated_everything".parse::<QueryType>();
        assert!(matches!(result, Err(RatingError::UnsupportedQuery(name)) if name == "most_rated_everything"));
    }

    #[test]
    fn test_ratings_for_object_counts_primaries_only() {
        let params = QueryParameters::new().target("doc:d:1").aspect("like").rating(-1);
        let predicate = QueryType::RatingsForObject.predicate(&params).unwrap();

        assert_eq!(predicate.verb, Some(VerbMatch::Exact("rating:like".to_string())));
        assert_eq!(predicate.target, Some(TargetMatch::Exact("doc:d:1".to_string())));
        assert_eq!(predicate.context, Some(ContextMatch::Primary));
        assert_eq!(predicate.value.as_deref(), Some("-1"));
        assert_eq!(predicate.actor, None);
    }

    #[test]
    fn test_cancel_ignores_context_and_defaults_to_every_aspect() {
        let params = QueryParameters::new().target("doc:d:1");
        let predicate = QueryType::RatingsForCancel.predicate(&params).unwrap();

        assert_eq!(predicate.verb, Some(VerbMatch::Prefix("rating:".to_string())));
        assert_eq!(predicate.context, None);
        assert_eq!(predicate.actor, None);

        let params = params.aspect("stars").actor("robin");
        let predicate = QueryType::RatingsForCancel.predicate(&params).unwrap();
        assert_eq!(predicate.verb, Some(VerbMatch::Exact("rating:stars".to_string())));
        assert_eq!(predicate.actor.as_deref(), Some("robin"));
    }

    #[test]
    fn test_latest_rated_restricts_to_documents() {
        let params = QueryParameters::new().actor("robin").aspect("like");
        let predicate = QueryType::LatestRatedForObject.predicate(&params).unwrap();

        assert_eq!(predicate.target, Some(TargetMatch::Prefix("doc:".to_string())));
        assert_eq!(predicate.context, Some(ContextMatch::Primary));
    }

    #[test]
    fn test_missing_parameters() {
        let result = QueryType::ActorRatingsForObject
            .predicate(&QueryParameters::new().target("doc:d:1").aspect("like"));
        assert!(matches!(result, Err(RatingError::MissingParameter("actor"))));

        let result = QueryType::RatedChildrenForContext
            .predicate(&QueryParameters::new().aspect("like"));
        assert!(matches!(result, Err(RatingError::MissingParameter("context"))));
    }
}
