use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::TargetKind;

/// A target with the number of matching rating events found for it.
///
/// `first_event_id` is the lowest id among those events and breaks score ties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedTarget {
    pub target: String,
    pub score: u64,
    #[serde(skip)]
    pub first_event_id: i64,
}

impl RatedTarget {
    /// Score descending, then first event id ascending.
    pub fn rank_order(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.first_event_id.cmp(&other.first_event_id))
    }
}

/// One entry of a most-liked ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub target: String,
    pub kind: TargetKind,
    pub score: u64,
    /// Whether the requesting user liked this target; `false` without a caller.
    pub caller_has_rated: bool,
    #[serde(skip)]
    pub first_event_id: i64,
}

impl RankedEntry {
    pub fn from_rated(rated: RatedTarget, kind: TargetKind, caller_has_rated: bool) -> Self {
        Self {
            target: rated.target,
            kind,
            score: rated.score,
            caller_has_rated,
            first_event_id: rated.first_event_id,
        }
    }

    /// Score descending, then first event id ascending.
    pub fn rank_order(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.first_event_id.cmp(&other.first_event_id))
    }
}
