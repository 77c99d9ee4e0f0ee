//! Generation-ordered traversal results.

use serde::{Deserialize, Serialize};

use super::document::DocumentId;

/// Ordered list of generations reached from a query node.
///
/// Level `i` holds the nodes first reached at exactly `i + 1` hops, in
/// discovery order. A node appears at most once across all levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generations(Vec<Vec<DocumentId>>);

impl Generations {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, level: Vec<DocumentId>) {
        self.0.push(level);
    }

    /// Number of generations.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether no relative was found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nodes of generation `index` (0 = one hop away).
    pub fn level(&self, index: usize) -> Option<&[DocumentId]> {
        self.0.get(index).map(Vec::as_slice)
    }

    /// All levels.
    pub fn levels(&self) -> &[Vec<DocumentId>] {
        &self.0
    }

    /// Iterate over levels.
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<DocumentId>> {
        self.0.iter()
    }

    /// All nodes, shallowest generation first.
    pub fn flatten(&self) -> Vec<&DocumentId> {
        self.0.iter().flatten().collect()
    }

    /// Total number of nodes across all generations.
    pub fn total_nodes(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// Size of the largest generation.
    pub fn max_breadth(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Generation index at which `id` was reached.
    pub fn generation_of(&self, id: &DocumentId) -> Option<usize> {
        self.0.iter().position(|level| level.contains(id))
    }

    /// Whether `id` appears in any generation.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.generation_of(id).is_some()
    }

    /// Levels as string slices, convenient for comparisons and display.
    pub fn as_str_levels(&self) -> Vec<Vec<&str>> {
        self.0
            .iter()
            .map(|level| level.iter().map(DocumentId::as_str).collect())
            .collect()
    }

    /// Consume into the raw level list.
    pub fn into_inner(self) -> Vec<Vec<DocumentId>> {
        self.0
    }
}

impl From<Vec<Vec<DocumentId>>> for Generations {
    fn from(levels: Vec<Vec<DocumentId>>) -> Self {
        Self(levels)
    }
}

impl From<Generations> for Vec<Vec<DocumentId>> {
    fn from(generations: Generations) -> Self {
        generations.0
    }
}

impl<'a> IntoIterator for &'a Generations {
    type Item = &'a Vec<DocumentId>;
    type IntoIter = std::slice::Iter<'a, Vec<DocumentId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
