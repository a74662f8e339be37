use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LedgerEvent;

/// Matches the verb of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerbMatch {
    Exact(String),
    Prefix(String),
}

impl VerbMatch {
    pub fn matches(&self, verb: &str) -> bool {
        match self {
            VerbMatch::Exact(expected) => verb == expected,
            VerbMatch::Prefix(prefix) => verb.starts_with(prefix.as_str()),
        }
    }
}

/// Matches the target of an event. Events without a target never match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetMatch {
    Exact(String),
    Prefix(String),
    /// Any of the listed targets; an empty list matches nothing.
    AnyOf(Vec<String>),
}

impl TargetMatch {
    pub fn matches(&self, target: Option<&str>) -> bool {
        let Some(target) = target else {
            return false;
        };
        match self {
            TargetMatch::Exact(expected) => target == expected,
            TargetMatch::Prefix(prefix) => target.starts_with(prefix.as_str()),
            TargetMatch::AnyOf(targets) => targets.iter().any(|candidate| candidate == target),
        }
    }
}

/// Matches the context of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextMatch {
    /// Primary events only (`context IS NULL`).
    Primary,
    /// Events scoped to exactly this container.
    Exact(String),
}

impl ContextMatch {
    pub fn matches(&self, context: Option<&str>) -> bool {
        match self {
            ContextMatch::Primary => context.is_none(),
            ContextMatch::Exact(expected) => context == Some(expected.as_str()),
        }
    }
}

/// An inclusive time window on the publication date (BETWEEN semantics).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }

    pub fn is_valid(&self) -> bool {
        self.from <= self.to
    }
}

/// A conjunction of optional filters over ledger events.
///
/// Every field left to `None` matches everything. The predicate is evaluated in
/// memory through [`EventPredicate::matches`] and translated to SQL by the
/// PostgreSQL ledger; both must agree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventPredicate {
    pub verb: Option<VerbMatch>,
    pub actor: Option<String>,
    pub target: Option<TargetMatch>,
    pub context: Option<ContextMatch>,
    pub value: Option<String>,
    pub published: Option<DateWindow>,
    pub ids: Option<Vec<i64>>,
}

impl EventPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(VerbMatch::Exact(verb.into()));
        self
    }

    pub fn with_verb_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.verb = Some(VerbMatch::Prefix(prefix.into()));
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(TargetMatch::Exact(target.into()));
        self
    }

    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target = Some(TargetMatch::Prefix(prefix.into()));
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.target = Some(TargetMatch::AnyOf(targets));
        self
    }

    pub fn primary(mut self) -> Self {
        self.context = Some(ContextMatch::Primary);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(ContextMatch::Exact(context.into()));
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn published_within(mut self, window: Option<DateWindow>) -> Self {
        self.published = window;
        self
    }

    pub fn with_ids(mut self, ids: Vec<i64>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Evaluates the predicate against an event.
    ///
    /// # Arguments
    ///
    /// * `event` - The event to test
    ///
    /// # Returns
    ///
    /// `true` when every set filter accepts the event.
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.verb.as_ref().is_none_or(|verb| verb.matches(&event.verb))
            && self.actor.as_ref().is_none_or(|actor| *actor == event.actor)
            && self
                .target
                .as_ref()
                .is_none_or(|target| target.matches(event.target.as_deref()))
            && self
                .context
                .as_ref()
                .is_none_or(|context| context.matches(event.context.as_deref()))
            && self.value.as_ref().is_none_or(|value| *value == event.value)
            && self
                .published
                .is_none_or(|window| window.contains(event.published_at))
            && self.ids.as_ref().is_none_or(|ids| ids.contains(&event.id))
    }
}

/// Result ordering of a ledger query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventOrder {
    /// Id ascending.
    #[default]
    Insertion,
    /// Publication date descending, then id descending.
    NewestFirst,
}

/// Pagination and ordering of a ledger query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub offset: usize,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    pub order: EventOrder,
}

impl QueryOptions {
    pub fn limited(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = EventOrder::NewestFirst;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewEvent;
    use chrono::{Duration, TimeZone};

    fn event(id: i64, actor: &str, target: &str, value: i64, context: Option<&str>) -> LedgerEvent {
        let mut event = NewEvent::rating(actor, "like", target, value)
            .published_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        event.context = context.map(str::to_string);
        event.into_event(id)
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let predicate = EventPredicate::new();
        assert!(predicate.matches(&event(1, "robin", "doc:d:1", 1, None)));
        assert!(predicate.matches(&event(2, "ted", "doc:d:2", -1, Some("doc:d:ws"))));
    }

    #[test]
    fn test_primary_excludes_companions() {
        let predicate = EventPredicate::new().with_target("doc:d:1").primary();
        assert!(predicate.matches(&event(1, "robin", "doc:d:1", 1, None)));
        assert!(!predicate.matches(&event(2, "robin", "doc:d:1", 1, Some("doc:d:ws"))));
    }

    #[test]
    fn test_verb_prefix_and_value() {
        let predicate = EventPredicate::new().with_verb_prefix("rating:").with_value("-1");
        assert!(predicate.matches(&event(1, "ted", "doc:d:1", -1, None)));
        assert!(!predicate.matches(&event(2, "ted", "doc:d:1", 1, None)));

        let post = NewEvent::new("ted", "minimessage", "hi").into_event(3);
        assert!(!EventPredicate::new().with_verb_prefix("rating:").matches(&post));
    }

    #[test]
    fn test_target_matching_requires_a_target() {
        let post = NewEvent::new("ted", "minimessage", "hi").into_event(3);
        assert!(!TargetMatch::Prefix("doc:".to_string()).matches(post.target.as_deref()));
        assert!(!TargetMatch::AnyOf(vec![]).matches(Some("activity:1")));
        assert!(
            TargetMatch::AnyOf(vec!["activity:1".to_string(), "activity:2".to_string()])
                .matches(Some("activity:2"))
        );
    }

    #[test]
    fn test_window_is_inclusive() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let rated = event(1, "robin", "doc:d:1", 1, None);

        let exact = EventPredicate::new().published_within(Some(DateWindow::new(at, at)));
        assert!(exact.matches(&rated));

        let later = DateWindow::new(at + Duration::seconds(1), at + Duration::days(1));
        assert!(!EventPredicate::new().published_within(Some(later)).matches(&rated));
    }

    #[test]
    fn test_ids_filter() {
        let predicate = EventPredicate::new().with_ids(vec![2, 5]);
        assert!(predicate.matches(&event(5, "robin", "doc:d:1", 1, None)));
        assert!(!predicate.matches(&event(1, "robin", "doc:d:1", 1, None)));
    }

    #[test]
    fn test_window_validity() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert!(DateWindow::new(at, at).is_valid());
        assert!(!DateWindow::new(at + Duration::days(1), at).is_valid());
    }

    #[test]
    fn test_query_options_builders() {
        let options = QueryOptions::limited(3).with_offset(2).newest_first();
        assert_eq!(options.limit, Some(3));
        assert_eq!(options.offset, 2);
        assert_eq!(options.order, EventOrder::NewestFirst);
        assert_eq!(QueryOptions::default().order, EventOrder::Insertion);
    }
}
