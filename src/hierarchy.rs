//! Self-referential trees: cycle validation and hierarchical display names.
//!
//! Nothing in here knows about a particular table. Callers provide parent
//! lookups through [`ParentResolver`] (a database walk, or an in-memory
//! [`TreeSnapshot`]) and get back validation errors or joined names.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::errors::ServiceError;

/// Separator placed between ancestor names in a display name
pub const DISPLAY_NAME_SEPARATOR: &str = " / ";

/// Looks up the parent of a node
#[async_trait]
pub trait ParentResolver: Send + Sync {
    /// Parent of `id`, or `None` for a root (or an unknown node)
    async fn parent_of(&self, id: i32) -> Result<Option<i32>, ServiceError>;
}

/// Fails when placing `node` under `proposed_parent` would create a cycle.
///
/// Walks up from the proposed parent. Meeting `node` on the way means the
/// proposed parent is `node` itself or one of its descendants. A repeated
/// ancestor means the stored tree is already cyclic; that is rejected too
/// so the walk always terminates.
pub async fn ensure_acyclic<R>(
    resolver: &R,
    node: i32,
    proposed_parent: Option<i32>,
) -> Result<(), ServiceError>
where
    R: ParentResolver + ?Sized,
{
    let mut visited = HashSet::new();
    let mut current = proposed_parent;

    while let Some(id) = current {
        if id == node {
            return Err(ServiceError::ValidationError(format!(
                "Recursive hierarchy: {} cannot be placed under {}",
                node,
                proposed_parent.unwrap_or(id)
            )));
        }
        if !visited.insert(id) {
            return Err(ServiceError::ValidationError(format!(
                "Existing hierarchy above {} already contains a cycle",
                id
            )));
        }
        current = resolver.parent_of(id).await?;
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct SnapshotNode {
    name: String,
    parent_id: Option<i32>,
}

/// Point-in-time copy of a tree's `(id, name, parent_id)` rows
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    nodes: HashMap<i32, SnapshotNode>,
}

impl TreeSnapshot {
    pub fn from_nodes<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i32, S, Option<i32>)>,
        S: Into<String>,
    {
        let nodes = rows
            .into_iter()
            .map(|(id, name, parent_id)| {
                (
                    id,
                    SnapshotNode {
                        name: name.into(),
                        parent_id,
                    },
                )
            })
            .collect();
        Self { nodes }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ids from the root down to `id` (inclusive). Parents missing from the
    /// snapshot end the chain; a corrupt cycle stops at the first repeat.
    pub fn ancestry(&self, id: i32) -> Vec<i32> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            if !seen.insert(node_id) {
                break;
            }
            chain.push(node_id);
            current = node.parent_id;
        }

        chain.reverse();
        chain
    }

    /// Ancestor names joined root-first, e.g. `"Production / Assembly"`
    pub fn display_name(&self, id: i32) -> Option<String> {
        if !self.contains(id) {
            return None;
        }
        let names: Vec<&str> = self
            .ancestry(id)
            .into_iter()
            .filter_map(|node_id| self.nodes.get(&node_id).map(|n| n.name.as_str()))
            .collect();
        Some(names.join(DISPLAY_NAME_SEPARATOR))
    }
}

#[async_trait]
impl ParentResolver for TreeSnapshot {
    async fn parent_of(&self, id: i32) -> Result<Option<i32>, ServiceError> {
        Ok(self.nodes.get(&id).and_then(|node| node.parent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // 1 Production <- 2 Assembly <- 3 Electronics, 4 Standalone
    fn sample() -> TreeSnapshot {
        TreeSnapshot::from_nodes(vec![
            (1, "Production", None),
            (2, "Assembly", Some(1)),
            (3, "Electronics", Some(2)),
            (4, "Standalone", None),
        ])
    }

    #[test]
    fn display_name_joins_root_first() {
        let tree = sample();
        assert_eq!(tree.display_name(1).as_deref(), Some("Production"));
        assert_eq!(tree.display_name(2).as_deref(), Some("Production / Assembly"));
        assert_eq!(
            tree.display_name(3).as_deref(),
            Some("Production / Assembly / Electronics")
        );
        assert_eq!(tree.display_name(99), None);
    }

    #[test]
    fn missing_parent_shortens_the_chain() {
        let tree = TreeSnapshot::from_nodes(vec![(2, "Assembly", Some(1)), (3, "Electronics", Some(2))]);
        assert_eq!(tree.display_name(3).as_deref(), Some("Assembly / Electronics"));
        assert_eq!(tree.ancestry(3), vec![2, 3]);
    }

    #[test]
    fn corrupt_cycle_does_not_loop_forever() {
        let tree = TreeSnapshot::from_nodes(vec![(1, "A", Some(2)), (2, "B", Some(1))]);
        assert_eq!(tree.display_name(1).as_deref(), Some("B / A"));
    }

    #[tokio::test]
    async fn descendant_as_parent_is_rejected() {
        let tree = sample();
        let result = ensure_acyclic(&tree, 1, Some(3)).await;
        assert_matches!(result, Err(ServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn self_parent_is_rejected() {
        let tree = sample();
        assert_matches!(
            ensure_acyclic(&tree, 2, Some(2)).await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn unrelated_or_empty_parent_is_accepted() {
        let tree = sample();
        assert!(ensure_acyclic(&tree, 2, Some(4)).await.is_ok());
        assert!(ensure_acyclic(&tree, 3, Some(1)).await.is_ok());
        assert!(ensure_acyclic(&tree, 1, None).await.is_ok());
    }

    #[tokio::test]
    async fn existing_cycle_above_parent_is_reported() {
        let tree = TreeSnapshot::from_nodes(vec![(1, "A", Some(2)), (2, "B", Some(1)), (3, "C", None)]);
        assert_matches!(
            ensure_acyclic(&tree, 3, Some(1)).await,
            Err(ServiceError::ValidationError(_))
        );
    }
}
