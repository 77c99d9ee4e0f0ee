//! Node record and its insertion-ordered adjacency sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::document::DocumentId;

/// Insertion-ordered set of document identities.
///
/// Iteration follows the order in which entries were first inserted, which
/// is what makes traversal output stable across repeated calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DocumentId>", into = "Vec<DocumentId>")]
pub struct IdSet {
    order: Vec<DocumentId>,
    members: HashSet<DocumentId>,
}

impl IdSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` if absent. Returns `true` if it was inserted.
    pub fn insert(&mut self, id: DocumentId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: &DocumentId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|existing| existing != id);
        true
    }

    /// Replace `old` with `new` at the same position.
    ///
    /// If `new` is already a member, `old` is simply dropped.
    pub fn replace(&mut self, old: &DocumentId, new: &DocumentId) -> bool {
        if !self.members.contains(old) {
            return false;
        }
        if old == new {
            return true;
        }
        if self.members.contains(new) {
            return self.remove(old);
        }
        self.members.remove(old);
        self.members.insert(new.clone());
        if let Some(slot) = self.order.iter_mut().find(|existing| *existing == old) {
            *slot = new.clone();
        }
        true
    }

    /// Membership test.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.members.contains(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DocumentId> {
        self.order.iter()
    }

    /// Entries in insertion order.
    pub fn as_slice(&self) -> &[DocumentId] {
        &self.order
    }

    /// Keep only entries for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&DocumentId) -> bool) {
        let members = &mut self.members;
        self.order.retain(|id| {
            let kept = keep(id);
            if !kept {
                members.remove(id);
            }
            kept
        });
    }
}

impl PartialEq for IdSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for IdSet {}

impl From<Vec<DocumentId>> for IdSet {
    fn from(ids: Vec<DocumentId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<IdSet> for Vec<DocumentId> {
    fn from(set: IdSet) -> Self {
        set.order
    }
}

impl FromIterator<DocumentId> for IdSet {
    fn from_iter<I: IntoIterator<Item = DocumentId>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a DocumentId;
    type IntoIter = std::slice::Iter<'a, DocumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// One document in the relationship graph.
///
/// `parents` are the documents this one names in its parent field;
/// `children` is the reverse index maintained by the node store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNode {
    /// Identity of the document.
    pub id: DocumentId,
    /// Declared parents, in edge creation order.
    pub parents: IdSet,
    /// Documents that declare this one as a parent, in edge creation order.
    pub children: IdSet,
}

impl RelationNode {
    /// Create a node with no edges.
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            parents: IdSet::new(),
            children: IdSet::new(),
        }
    }

    /// No declared parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// No children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Neither parents nor children.
    pub fn is_orphan(&self) -> bool {
        self.is_root() && self.is_leaf()
    }
}
