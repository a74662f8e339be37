//! Configuration types for the most-liked ranking.
use rating_ledger_shared::types::MINI_MESSAGE_VERB;

/// Configuration for the `MostLikedRanker`.
///
/// Optionally bounds the size of a ranking request and names the verb identifying
/// short-message posts in the ledger.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Maximum number of entries a single ranking may request.
    ///
    /// `None` (the default) lets a ranking request any number of entries and
    /// truncates the result to that count.
    pub max_limit: Option<usize>,

    /// Verb of the posts whose likes are ranked alongside documents.
    pub post_verb: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_limit: None,
            post_verb: MINI_MESSAGE_VERB.to_string(),
        }
    }
}

impl RankingConfig {
    /// Create a config with no limit cap.
    ///
    /// # Returns
    ///
    /// A `RankingConfig` with `max_limit` set to `None`.
    pub fn unlimited() -> Self {
        Self {
            max_limit: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom limit cap.
    ///
    /// # Arguments
    ///
    /// * `max_limit` - Maximum number of entries a ranking may request
    pub fn with_max_limit(max_limit: usize) -> Self {
        Self {
            max_limit: Some(max_limit),
            ..Self::default()
        }
    }
}
