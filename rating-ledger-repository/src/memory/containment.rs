use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::{ContainmentError, ContainmentResolver};

#[derive(Debug, Clone)]
struct Node {
    parent: Option<String>,
    rollup: bool,
}

/// In-memory containment tree.
///
/// Built once through the consuming builder methods, then shared read-only.
/// Targets unknown to the tree have no ancestors.
///
/// ```
/// use rating_ledger_repository::InMemoryContainment;
///
/// let tree = InMemoryContainment::new()
///     .container("doc:default:domain", None, true)
///     .container("doc:default:workspaces", Some("doc:default:domain"), true)
///     .item("doc:default:report", "doc:default:workspaces");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryContainment {
    nodes: HashMap<String, Node>,
}

impl InMemoryContainment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of the container
    /// * `parent` - Enclosing container, `None` for a root
    /// * `rollup` - Whether ratings on descendants are rolled up to this container
    pub fn container(mut self, id: impl Into<String>, parent: Option<&str>, rollup: bool) -> Self {
        self.nodes.insert(
            id.into(),
            Node {
                parent: parent.map(str::to_string),
                rollup,
            },
        );
        self
    }

    /// Registers a rateable item placed in a container.
    pub fn item(mut self, id: impl Into<String>, parent: &str) -> Self {
        self.nodes.insert(
            id.into(),
            Node {
                parent: Some(parent.to_string()),
                rollup: false,
            },
        );
        self
    }
}

#[async_trait]
impl ContainmentResolver for InMemoryContainment {
    async fn rollup_ancestors(&self, target: &str) -> Result<Vec<String>, ContainmentError> {
        let mut ancestors = Vec::new();
        let mut visited = HashSet::from([target.to_string()]);
        let mut current = self.nodes.get(target).and_then(|node| node.parent.clone());

        while let Some(id) = current {
            if !visited.insert(id.clone()) {
                return Err(ContainmentError::CycleDetected(id));
            }
            let node = self.nodes.get(&id);
            if node.is_some_and(|node| node.rollup) {
                ancestors.push(id.clone());
            }
            current = node.and_then(|node| node.parent.clone());
        }

        Ok(ancestors)
    }
}
