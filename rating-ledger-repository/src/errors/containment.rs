use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur while resolving the container hierarchy of a target.
pub enum ContainmentError {
    #[error("Containment cycle detected at: {0}")]
    CycleDetected(String),

    #[error("Containment unavailable: {0}")]
    Unavailable(String),
}
