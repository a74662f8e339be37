//! # Rating Ledger Engine
//! This crate computes ratings and likes on top of an append-only activity ledger.
//! It provides the rating aggregation queries, the like/dislike façade, rollup of
//! document ratings to their containers, the most-liked ranking and the
//! de-duplication pass compensating for concurrent likes.
pub mod config;
pub mod dedup;
pub mod errors;
pub mod like;
pub mod ranking;
pub mod rating;
pub mod rollup;

pub use config::RankingConfig;
pub use dedup::{DedupReport, Deduplicator};
pub use errors::RatingError;
pub use like::LikeService;
pub use ranking::{MostLikedRanker, MostLikedRequest};
pub use rating::{QueryParameters, QueryType, RatingService};
pub use rollup::RollupPropagator;
