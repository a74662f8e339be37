mod activity_object;
mod constants;
mod event;
mod like_status;
mod predicate;
mod ranked_entry;

pub use activity_object::{ACTIVITY_PREFIX, DOCUMENT_PREFIX, TargetKind, activity_object};
pub use constants::{
    DISLIKE_RATING, LIKE_ASPECT, LIKE_RATING, MINI_MESSAGE_VERB, RATING_VERB_PREFIX, rating_verb,
};
pub use event::{LedgerEvent, NewEvent};
pub use like_status::{LikeStatus, UserLikeStatus};
pub use predicate::{
    ContextMatch, DateWindow, EventOrder, EventPredicate, QueryOptions, TargetMatch, VerbMatch,
};
pub use ranked_entry::{RankedEntry, RatedTarget};
