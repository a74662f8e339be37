/// Prefix shared by the verb of every rating event; the aspect follows it.
pub const RATING_VERB_PREFIX: &str = "rating:";

/// Aspect used by the like/dislike façade.
pub const LIKE_ASPECT: &str = "like";

/// Rating value stored for a like.
pub const LIKE_RATING: i64 = 1;

/// Rating value stored for a dislike.
pub const DISLIKE_RATING: i64 = -1;

/// Verb of short-message posts published into a container.
pub const MINI_MESSAGE_VERB: &str = "minimessage";

/// Builds the verb of a rating event for the given aspect, e.g. `rating:like`.
pub fn rating_verb(aspect: &str) -> String {
    format!("{RATING_VERB_PREFIX}{aspect}")
}
