use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::constants::rating_verb;

/// Represents an event stored in the activity ledger.
///
/// Rating events carry a verb of the form `rating:<aspect>`, a target and a
/// string-encoded integer value. A `context` of `None` marks the primary rating;
/// a container identifier marks a rollup companion of that rating.
/// Other activities (short-message posts) share the same shape and may lack a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub id: i64,
    pub actor: String,
    pub verb: String,
    pub target: Option<String>,
    pub value: String,
    pub context: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl LedgerEvent {
    /// Parses the stored value as an integer rating.
    ///
    /// # Returns
    ///
    /// `None` when the stored value is not an integer.
    pub fn rating(&self) -> Option<i64> {
        self.value.parse().ok()
    }

    pub fn is_primary(&self) -> bool {
        self.context.is_none()
    }
}

/// An event waiting to be appended; the ledger assigns its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    pub actor: String,
    pub verb: String,
    pub target: Option<String>,
    pub value: String,
    pub context: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl NewEvent {
    /// Creates an activity published now, without target or context.
    pub fn new(actor: impl Into<String>, verb: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            verb: verb.into(),
            target: None,
            value: value.into(),
            context: None,
            published_at: Utc::now(),
        }
    }

    /// Creates a primary rating event published now.
    ///
    /// # Arguments
    ///
    /// * `actor` - The rating user
    /// * `aspect` - The rated aspect, stored as verb `rating:<aspect>`
    /// * `target` - The rated activity object
    /// * `value` - The integer rating, stored in its decimal form
    pub fn rating(
        actor: impl Into<String>,
        aspect: &str,
        target: impl Into<String>,
        value: i64,
    ) -> Self {
        Self::new(actor, rating_verb(aspect), value.to_string()).with_target(target)
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = published_at;
        self
    }

    /// Returns a copy of this event scoped to the given container.
    ///
    /// Used to derive rollup companions from a primary rating: actor, verb,
    /// target, value and timestamp are kept, only the context changes.
    pub fn companion_in(&self, container: impl Into<String>) -> Self {
        self.clone().with_context(container)
    }

    /// Materialises the event with the id assigned by the ledger.
    pub fn into_event(self, id: i64) -> LedgerEvent {
        LedgerEvent {
            id,
            actor: self.actor,
            verb: self.verb,
            target: self.target,
            value: self.value,
            context: self.context,
            published_at: self.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rating_event_shape() {
        let event = NewEvent::rating("robin", "like", "doc:default:1", -1);

        assert_eq!(event.verb, "rating:like");
        assert_eq!(event.target.as_deref(), Some("doc:default:1"));
        assert_eq!(event.value, "-1");
        assert!(event.context.is_none());
    }

    #[test]
    fn test_companion_keeps_everything_but_context() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let primary = NewEvent::rating("ted", "like", "doc:default:1", 1).published_at(at);
        let companion = primary.companion_in("doc:default:workspaces");

        assert_eq!(companion.actor, primary.actor);
        assert_eq!(companion.verb, primary.verb);
        assert_eq!(companion.target, primary.target);
        assert_eq!(companion.value, primary.value);
        assert_eq!(companion.published_at, at);
        assert_eq!(companion.context.as_deref(), Some("doc:default:workspaces"));
    }

    #[test]
    fn test_ledger_event_accessors() {
        let event = NewEvent::rating("robin", "stars", "doc:default:1", 4).into_event(12);

        assert_eq!(event.id, 12);
        assert!(event.is_primary());
        assert_eq!(event.rating(), Some(4));

        let post = NewEvent::new("robin", "minimessage", "hello")
            .with_context("doc:default:workspaces")
            .into_event(13);
        assert!(!post.is_primary());
        assert_eq!(post.rating(), None);
    }
}
