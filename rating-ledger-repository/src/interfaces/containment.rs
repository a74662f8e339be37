use crate::errors::ContainmentError;

/// Trait for resolving the containers a rating on a target rolls up to.
///
/// This trait abstracts the document hierarchy: given a target, it yields the
/// identifiers of its ancestors flagged as rollup containers, nearest first.
#[async_trait::async_trait]
pub trait ContainmentResolver: Send + Sync {
    async fn rollup_ancestors(&self, target: &str) -> Result<Vec<String>, ContainmentError>;
}
