//! Rating aggregation over the activity ledger.
mod query;
mod service;

pub use query::{QueryParameters, QueryType};
pub use service::RatingService;
