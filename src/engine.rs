//! Relationship queries over a built graph.
//!
//! Ancestors and descendants share one generation-wise traversal that
//! follows a [`Direction`]. Every call threads a single visited set, seeded
//! with the query node, so a node is placed at most once and cyclic graphs
//! terminate without a separate cycle check.
//!
//! ## Ordering
//!
//! Generation `k` is built by iterating generation `k-1` in its own order
//! and, for each node, its adjacency list in stored order. Siblings and
//! cousins keep the same first-discovery order.

use std::collections::HashSet;

use crate::graph::RelationGraph;
use crate::types::{Direction, DocumentId, Generations, RelationQuery, RelationResult};

/// Read-only query layer over a [`RelationGraph`].
#[derive(Debug, Clone, Copy)]
pub struct RelationshipEngine<'g> {
    graph: &'g RelationGraph,
}

impl<'g> RelationshipEngine<'g> {
    /// Create an engine borrowing `graph`.
    pub fn new(graph: &'g RelationGraph) -> Self {
        Self { graph }
    }

    /// The graph being queried.
    pub fn graph(&self) -> &'g RelationGraph {
        self.graph
    }

    /// Walk `direction` from `start`, one generation per hop.
    ///
    /// Stops after `max_depth` generations or at the first empty one.
    /// An absent start yields no generations.
    pub fn generations(
        &self,
        start: &DocumentId,
        direction: Direction,
        max_depth: usize,
    ) -> Generations {
        let mut result = Generations::new();
        let origin = match self.graph.node(start) {
            Some(node) => node,
            None => return result,
        };

        let mut visited: HashSet<&'g DocumentId> = HashSet::new();
        visited.insert(&origin.id);
        let mut frontier: Vec<&'g DocumentId> = vec![&origin.id];

        while result.depth() < max_depth {
            let mut next: Vec<&'g DocumentId> = Vec::new();
            for id in &frontier {
                if let Some(node) = self.graph.node(id) {
                    for neighbor in direction.neighbors(node).iter() {
                        if visited.insert(neighbor) {
                            next.push(neighbor);
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            result.push(next.iter().map(|id| (*id).clone()).collect());
            frontier = next;
        }

        result
    }

    /// Ancestor generations of `node`. `None` uses the graph's default depth.
    pub fn get_ancestors(&self, node: &DocumentId, max_depth: Option<usize>) -> Generations {
        let depth = max_depth.unwrap_or_else(|| self.graph.max_depth());
        self.generations(node, Direction::Parents, depth)
    }

    /// Descendant generations of `node`. `None` uses the graph's default depth.
    pub fn get_descendants(&self, node: &DocumentId, max_depth: Option<usize>) -> Generations {
        let depth = max_depth.unwrap_or_else(|| self.graph.max_depth());
        self.generations(node, Direction::Children, depth)
    }

    /// Children of every parent of `node`, deduplicated.
    ///
    /// A node with no parents has no siblings, even with `include_self`.
    pub fn get_siblings(&self, node: &DocumentId, include_self: bool) -> Vec<DocumentId> {
        let mut seen: HashSet<&DocumentId> = HashSet::new();
        let mut siblings = Vec::new();
        for parent in self.graph.parents(node) {
            for child in self.graph.children(parent) {
                if (include_self || child != node) && seen.insert(child) {
                    siblings.push(child.clone());
                }
            }
        }
        siblings
    }

    /// Cousins of exactly `degree`: nodes whose closest shared ancestor
    /// with `node` is `degree + 1` generations up.
    ///
    /// Candidates are the depth-`degree + 1` descendants of the
    /// generation-`degree + 1` ancestors; anything reachable through a
    /// closer shared ancestor is removed, as are all siblings and `node`.
    pub fn get_cousins(&self, node: &DocumentId, degree: usize) -> Vec<DocumentId> {
        if degree == 0 {
            return Vec::new();
        }
        let up = Direction::Parents;
        let ancestors = self.generations(node, up, degree + 1);
        let shared = match ancestors.level(degree) {
            Some(level) => level,
            None => return Vec::new(),
        };

        let mut seen: HashSet<DocumentId> = HashSet::new();
        let mut candidates: Vec<DocumentId> = Vec::new();
        for ancestor in shared {
            let descendants = self.generations(ancestor, up.reverse(), degree + 1);
            if let Some(level) = descendants.level(degree) {
                for id in level {
                    if seen.insert(id.clone()) {
                        candidates.push(id.clone());
                    }
                }
            }
        }

        let excluded = self.closer_relatives(node, &ancestors, up.reverse(), degree);
        candidates.retain(|id| !excluded.contains(id));
        candidates
    }

    /// Everything reachable through a shared ancestor closer than
    /// `degree + 1`, plus every sibling and `node` itself.
    fn closer_relatives(
        &self,
        node: &DocumentId,
        ancestors: &Generations,
        down: Direction,
        degree: usize,
    ) -> HashSet<DocumentId> {
        let mut excluded: HashSet<DocumentId> = HashSet::new();
        for generation in 1..=degree {
            let closer = match ancestors.level(generation - 1) {
                Some(level) => level,
                None => break,
            };
            for ancestor in closer {
                let descendants = self.generations(ancestor, down, generation);
                if let Some(level) = descendants.level(generation - 1) {
                    excluded.extend(level.iter().cloned());
                }
            }
        }
        // self-parent edges put siblings out of reach of the walk above
        excluded.extend(self.get_siblings(node, true));
        excluded.insert(node.clone());
        excluded
    }

    /// Answer a tagged relation query.
    pub fn query(&self, node: &DocumentId, query: &RelationQuery) -> RelationResult {
        match *query {
            RelationQuery::Ancestors { max_depth } => {
                RelationResult::Generations(self.get_ancestors(node, max_depth))
            }
            RelationQuery::Descendants { max_depth } => {
                RelationResult::Generations(self.get_descendants(node, max_depth))
            }
            RelationQuery::Siblings { include_self } => {
                RelationResult::Flat(self.get_siblings(node, include_self))
            }
            RelationQuery::Cousins { degree } => RelationResult::Flat(self.get_cousins(node, degree)),
        }
    }
}

impl RelationGraph {
    /// Query engine over this graph.
    pub fn relations(&self) -> RelationshipEngine<'_> {
        RelationshipEngine::new(self)
    }
}
