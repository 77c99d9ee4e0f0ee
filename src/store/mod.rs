//! Node store: the single mutable table behind the relationship graph.
//!
//! Nodes are keyed by [`DocumentId`] in one table; parent and child sets hold
//! identities, never references. Every mutation goes through a routine that
//! updates both ends of an edge, so `Y ∈ X.parents ⇔ X ∈ Y.children` holds
//! after each call.

use std::collections::BTreeMap;

use crate::types::{DocumentId, IdSet, RelationNode};

/// Parent-set change applied by [`NodeStore::set_parents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentDiff {
    /// Parents that gained this node as a child.
    pub added: Vec<DocumentId>,
    /// Parents that lost this node as a child.
    pub removed: Vec<DocumentId>,
    /// Whether the node was created by this call.
    pub created: bool,
}

impl ParentDiff {
    /// No edge changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Identity → node table.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: BTreeMap<DocumentId, RelationNode>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of parent edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.parents.len()).sum()
    }

    /// Whether a node exists.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node.
    pub fn get(&self, id: &DocumentId) -> Option<&RelationNode> {
        self.nodes.get(id)
    }

    /// Parents of `id` in stored order; empty if absent.
    pub fn parents(&self, id: &DocumentId) -> &[DocumentId] {
        self.nodes
            .get(id)
            .map(|node| node.parents.as_slice())
            .unwrap_or(&[])
    }

    /// Children of `id` in stored order; empty if absent.
    pub fn children(&self, id: &DocumentId) -> &[DocumentId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// All identities, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> + '_ {
        self.nodes.keys()
    }

    /// All nodes, sorted by identity.
    pub fn nodes(&self) -> impl Iterator<Item = &RelationNode> + '_ {
        self.nodes.values()
    }

    /// All `(child, parent)` edges.
    pub fn edges(&self) -> impl Iterator<Item = (&DocumentId, &DocumentId)> + '_ {
        self.nodes
            .values()
            .flat_map(|node| node.parents.iter().map(move |parent| (&node.id, parent)))
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Create an edge-less node for `id` if it does not exist.
    ///
    /// Returns `true` if the node was created.
    pub fn ensure(&mut self, id: &DocumentId) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        self.nodes.insert(id.clone(), RelationNode::new(id.clone()));
        true
    }

    /// Replace the parent set of `id` with `new_parents`.
    ///
    /// Only the difference is applied: unchanged parents keep their position,
    /// new ones are appended in `new_parents` order, and the node's children
    /// are left untouched. Missing nodes (including `id`) are created.
    pub fn set_parents(&mut self, id: &DocumentId, new_parents: &[DocumentId]) -> ParentDiff {
        let created = self.ensure(id);
        let desired: IdSet = new_parents.iter().cloned().collect();
        for parent in desired.iter() {
            self.ensure(parent);
        }

        let current = self
            .nodes
            .get(id)
            .map(|node| node.parents.clone())
            .unwrap_or_default();
        let removed: Vec<DocumentId> = current
            .iter()
            .filter(|parent| !desired.contains(parent))
            .cloned()
            .collect();
        let added: Vec<DocumentId> = desired
            .iter()
            .filter(|parent| !current.contains(parent))
            .cloned()
            .collect();

        for parent in &removed {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.remove(id);
            }
        }
        for parent in &added {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.insert(id.clone());
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parents.retain(|parent| desired.contains(parent));
            for parent in &added {
                node.parents.insert(parent.clone());
            }
        }

        ParentDiff {
            added,
            removed,
            created,
        }
    }

    /// Remove `id` and de-reference it from every neighbor.
    ///
    /// Neighbors are kept; children simply lose this parent.
    pub fn remove(&mut self, id: &DocumentId) -> Option<RelationNode> {
        let node = self.nodes.remove(id)?;
        for parent in node.parents.iter() {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.remove(id);
            }
        }
        for child in node.children.iter() {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parents.remove(id);
            }
        }
        Some(node)
    }

    /// Move the node at `old` to `new`, re-targeting every edge.
    ///
    /// A node already stored at `new` is removed first. Returns `false` if
    /// `old` does not exist.
    pub fn rename(&mut self, old: &DocumentId, new: &DocumentId) -> bool {
        if old == new {
            return self.contains(old);
        }
        if !self.nodes.contains_key(old) {
            return false;
        }
        if self.nodes.contains_key(new) {
            self.remove(new);
        }
        let Some(mut node) = self.nodes.remove(old) else {
            return false;
        };

        node.id = new.clone();
        // self-loop edges point at the node itself
        node.parents.replace(old, new);
        node.children.replace(old, new);

        for parent in node.parents.iter() {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.replace(old, new);
            }
        }
        for child in node.children.iter() {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parents.replace(old, new);
            }
        }

        self.nodes.insert(new.clone(), node);
        true
    }

    /// Edges whose reverse entry is missing, as `(child, parent)` pairs.
    ///
    /// Always empty unless the store was corrupted from outside its API.
    pub fn inconsistencies(&self) -> Vec<(DocumentId, DocumentId)> {
        let mut broken = Vec::new();
        for node in self.nodes.values() {
            for parent in node.parents.iter() {
                let linked = self
                    .nodes
                    .get(parent)
                    .map(|p| p.children.contains(&node.id))
                    .unwrap_or(false);
                if !linked {
                    broken.push((node.id.clone(), parent.clone()));
                }
            }
            for child in node.children.iter() {
                let linked = self
                    .nodes
                    .get(child)
                    .map(|c| c.parents.contains(&node.id))
                    .unwrap_or(false);
                if !linked {
                    broken.push((child.clone(), node.id.clone()));
                }
            }
        }
        broken
    }

    /// Whether every edge is recorded on both ends.
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies().is_empty()
    }
}
