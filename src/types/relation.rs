//! Relation kinds, traversal direction and query envelopes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::DocumentId;
use super::generation::Generations;
use super::node::{IdSet, RelationNode};

/// Which adjacency set a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward declared parents (ancestors).
    Parents,
    /// Toward children (descendants).
    Children,
}

impl Direction {
    /// The adjacency set of `node` in this direction.
    pub fn neighbors<'a>(&self, node: &'a RelationNode) -> &'a IdSet {
        match self {
            Self::Parents => &node.parents,
            Self::Children => &node.children,
        }
    }

    /// The opposite direction.
    pub fn reverse(&self) -> Self {
        match self {
            Self::Parents => Self::Children,
            Self::Children => Self::Parents,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parents => write!(f, "parents"),
            Self::Children => write!(f, "children"),
        }
    }
}

/// Relationship family answered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Parents, grandparents, ...
    Ancestors,
    /// Children, grandchildren, ...
    Descendants,
    /// Nodes sharing a parent.
    Siblings,
    /// Nodes sharing an ancestor at a fixed generation.
    Cousins,
}

impl RelationKind {
    /// Parse a relation kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ancestors" | "ancestor" => Some(Self::Ancestors),
            "descendants" | "descendant" => Some(Self::Descendants),
            "siblings" | "sibling" => Some(Self::Siblings),
            "cousins" | "cousin" => Some(Self::Cousins),
            _ => None,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ancestors => write!(f, "ancestors"),
            Self::Descendants => write!(f, "descendants"),
            Self::Siblings => write!(f, "siblings"),
            Self::Cousins => write!(f, "cousins"),
        }
    }
}

/// A relationship query with its per-kind parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationQuery {
    /// Generation-ordered ancestors. `None` uses the graph's default depth.
    Ancestors {
        /// Maximum number of generations.
        max_depth: Option<usize>,
    },
    /// Generation-ordered descendants. `None` uses the graph's default depth.
    Descendants {
        /// Maximum number of generations.
        max_depth: Option<usize>,
    },
    /// Nodes sharing at least one parent.
    Siblings {
        /// Whether the query node itself is listed.
        include_self: bool,
    },
    /// Cousins of exactly `degree`.
    Cousins {
        /// Cousin degree, 1 = first cousins.
        degree: usize,
    },
}

impl RelationQuery {
    /// The relation family this query asks for.
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::Ancestors { .. } => RelationKind::Ancestors,
            Self::Descendants { .. } => RelationKind::Descendants,
            Self::Siblings { .. } => RelationKind::Siblings,
            Self::Cousins { .. } => RelationKind::Cousins,
        }
    }

    /// Default-parameter query for a kind.
    pub fn default_for(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Ancestors => Self::Ancestors { max_depth: None },
            RelationKind::Descendants => Self::Descendants { max_depth: None },
            RelationKind::Siblings => Self::Siblings { include_self: false },
            RelationKind::Cousins => Self::Cousins { degree: 1 },
        }
    }
}

/// Result of a [`RelationQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "nodes", rename_all = "snake_case")]
pub enum RelationResult {
    /// Ancestors or descendants, grouped by generation.
    Generations(Generations),
    /// Siblings or cousins, in discovery order.
    Flat(Vec<DocumentId>),
}

impl RelationResult {
    /// All nodes in the result, shallowest first.
    pub fn nodes(&self) -> Vec<&DocumentId> {
        match self {
            Self::Generations(generations) => generations.flatten(),
            Self::Flat(nodes) => nodes.iter().collect(),
        }
    }

    /// Number of nodes in the result.
    pub fn len(&self) -> usize {
        match self {
            Self::Generations(generations) => generations.total_nodes(),
            Self::Flat(nodes) => nodes.len(),
        }
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
