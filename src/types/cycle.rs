//! Cycle descriptions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::DocumentId;

/// A cycle found by following parent edges.
///
/// Each node's parent is the next node in `nodes`; the last node's parent
/// is the first. A self-loop is a cycle of length one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleInfo {
    /// Nodes on the cycle, in traversal order.
    pub nodes: Vec<DocumentId>,
}

impl CycleInfo {
    /// Create a cycle from its traversal-ordered nodes.
    pub fn new(nodes: Vec<DocumentId>) -> Self {
        Self { nodes }
    }

    /// Number of nodes on the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the cycle has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether this is a self-loop.
    pub fn is_self_loop(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether `id` lies on the cycle.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.nodes.contains(id)
    }

    /// Rotation-invariant key: the node sequence rotated to start at its
    /// smallest identity. Two cycles with equal keys are the same cycle.
    pub fn canonical_key(&self) -> Vec<DocumentId> {
        let start = self
            .nodes
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(index, _)| index)
            .unwrap_or(0);
        self.nodes[start..]
            .iter()
            .chain(self.nodes[..start].iter())
            .cloned()
            .collect()
    }
}

impl fmt::Display for CycleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{} -> ", node)?;
        }
        match self.nodes.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}
