use serde::{Deserialize, Serialize};

/// Prefix of document activity objects: `doc:<repository>:<docId>`.
pub const DOCUMENT_PREFIX: &str = "doc:";

/// Prefix of activity objects (posts and their replies): `activity:<id>`.
pub const ACTIVITY_PREFIX: &str = "activity:";

/// Classifies a rating target by its identifier prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A document that lives in the containment hierarchy.
    Document,
    /// A short-message post or one of its replies.
    Post,
    /// Anything else (users, external objects).
    Other,
}

impl TargetKind {
    /// Returns the kind of the given activity-object identifier.
    pub fn of(target: &str) -> Self {
        if target.starts_with(DOCUMENT_PREFIX) {
            TargetKind::Document
        } else if target.starts_with(ACTIVITY_PREFIX) {
            TargetKind::Post
        } else {
            TargetKind::Other
        }
    }

    /// Only documents have containers to roll ratings up to.
    pub fn is_containable(self) -> bool {
        matches!(self, TargetKind::Document)
    }
}

pub fn activity_object(activity_id: i64) -> String {
    format!("{ACTIVITY_PREFIX}{activity_id}")
}
