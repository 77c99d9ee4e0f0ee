//! Graph health diagnostics.
//!
//! ## Findings
//!
//! | Finding | Severity | Fails health |
//! |---------|----------|--------------|
//! | Cycle | ERROR | yes |
//! | Orphaned node | WARNING | no |
//! | Graph statistics | INFO | no |
//!
//! A graph is healthy iff the report carries no error.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::RelationshipEngine;
use crate::graph::RelationGraph;
use crate::store::NodeStore;
use crate::types::{CycleInfo, Direction, DocumentId};

/// Severity levels for diagnostic findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational summary.
    Info,
    /// Worth a look; does not fail health.
    Warning,
    /// Structural problem; fails health.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Aggregate structural statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDiagnostics {
    /// Number of nodes.
    pub total_nodes: usize,
    /// Sum of all parent edges.
    pub total_edges: usize,
    /// Nodes with no parents.
    pub root_count: usize,
    /// Nodes with no children.
    pub leaf_count: usize,
    /// Hops in the longest simple ancestor chain above any node.
    pub max_depth: usize,
    /// Largest single ancestor generation seen from any node.
    pub max_breadth: usize,
    /// Number of distinct cycles.
    pub cycle_count: usize,
    /// `total_edges / total_nodes`, 0 when empty.
    pub average_children: f64,
}

/// What a diagnostic finding is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    /// A node with neither parents nor children.
    OrphanedNode {
        /// The orphaned node.
        id: DocumentId,
    },
    /// A cycle along parent edges.
    Cycle {
        /// Nodes on the cycle.
        cycle: CycleInfo,
    },
    /// Summary of the statistics.
    GraphStatistics,
}

impl IssueKind {
    /// Severity of this kind of finding.
    pub fn severity(&self) -> Severity {
        match self {
            Self::OrphanedNode { .. } => Severity::Warning,
            Self::Cycle { .. } => Severity::Error,
            Self::GraphStatistics => Severity::Info,
        }
    }
}

/// A single diagnostic finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticIssue {
    /// Severity level.
    pub severity: Severity,
    /// What the finding is about.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

impl DiagnosticIssue {
    /// Create a finding; severity follows from the kind.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }

    /// Log this finding as a structured event at its severity's level.
    pub fn log(&self) {
        match self.severity {
            Severity::Error => tracing::error!(
                severity = %self.severity,
                kind = ?self.kind,
                "GRAPH_DIAGNOSTIC: {}",
                self.message
            ),
            Severity::Warning => tracing::warn!(
                severity = %self.severity,
                kind = ?self.kind,
                "GRAPH_DIAGNOSTIC: {}",
                self.message
            ),
            Severity::Info => tracing::info!(
                severity = %self.severity,
                "GRAPH_DIAGNOSTIC: {}",
                self.message
            ),
        }
    }
}

/// Health report for a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// Aggregate statistics.
    pub stats: GraphDiagnostics,
    /// Findings, errors first.
    pub issues: Vec<DiagnosticIssue>,
    /// Snapshot id of the graph the report describes.
    pub snapshot_id: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl DiagnosticReport {
    /// Whether no finding has error severity.
    pub fn is_healthy(&self) -> bool {
        self.error_count() == 0
    }

    /// Number of error findings.
    pub fn error_count(&self) -> usize {
        self.issues_with(Severity::Error).count()
    }

    /// Number of warning findings.
    pub fn warning_count(&self) -> usize {
        self.issues_with(Severity::Warning).count()
    }

    /// Findings of one severity.
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticIssue> + '_ {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }

    /// Log every finding.
    pub fn log(&self) {
        for issue in &self.issues {
            issue.log();
        }
    }
}

/// One frame of the longest-chain walk.
struct ChainFrame<'a> {
    id: &'a DocumentId,
    parents: &'a [DocumentId],
    next: usize,
    best: usize,
}

/// Hops in the longest simple chain of parent edges anywhere in `store`.
///
/// Depth-first over parents with an on-path set, so an edge back onto the
/// current chain is never followed. Heights of finished nodes are memoized;
/// on the acyclic part that memo is exact.
fn longest_ancestor_chain(store: &NodeStore) -> usize {
    let mut heights: HashMap<&DocumentId, usize> = HashMap::new();
    let mut longest = 0;
    for node in store.nodes() {
        longest = longest.max(chain_height(store, &node.id, &mut heights));
    }
    longest
}

fn chain_height<'a>(
    store: &'a NodeStore,
    start: &'a DocumentId,
    heights: &mut HashMap<&'a DocumentId, usize>,
) -> usize {
    if let Some(height) = heights.get(start) {
        return *height;
    }

    let mut on_path: HashSet<&'a DocumentId> = HashSet::new();
    on_path.insert(start);
    let mut stack = vec![ChainFrame {
        id: start,
        parents: store.parents(start),
        next: 0,
        best: 0,
    }];
    let mut height = 0;

    while let Some(frame) = stack.last_mut() {
        let parents = frame.parents;
        match parents.get(frame.next) {
            Some(parent) => {
                frame.next += 1;
                if on_path.contains(parent) {
                    continue;
                }
                if let Some(known) = heights.get(parent) {
                    frame.best = frame.best.max(known + 1);
                } else {
                    on_path.insert(parent);
                    stack.push(ChainFrame {
                        id: parent,
                        parents: store.parents(parent),
                        next: 0,
                        best: 0,
                    });
                }
            }
            None => {
                if let Some(done) = stack.pop() {
                    on_path.remove(done.id);
                    heights.insert(done.id, done.best);
                    match stack.last_mut() {
                        Some(caller) => caller.best = caller.best.max(done.best + 1),
                        None => height = done.best,
                    }
                }
            }
        }
    }

    height
}

/// Computes [`DiagnosticReport`]s. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphValidator;

impl GraphValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Compute statistics and findings for `graph`.
    pub fn validate(&self, graph: &RelationGraph) -> DiagnosticReport {
        let store = graph.store();
        let engine = RelationshipEngine::new(graph);
        let cycles = graph.all_cycles();

        let mut stats = GraphDiagnostics {
            total_nodes: store.len(),
            total_edges: store.edge_count(),
            cycle_count: cycles.len(),
            ..GraphDiagnostics::default()
        };
        let mut orphans: Vec<&DocumentId> = Vec::new();

        for node in store.nodes() {
            if node.is_root() {
                stats.root_count += 1;
            }
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            if node.is_orphan() {
                orphans.push(&node.id);
            }
            // unbounded depth; the visited set bounds the walk
            let ancestors = engine.generations(&node.id, Direction::Parents, usize::MAX);
            stats.max_breadth = stats.max_breadth.max(ancestors.max_breadth());
        }
        stats.max_depth = longest_ancestor_chain(store);
        if stats.total_nodes > 0 {
            stats.average_children = stats.total_edges as f64 / stats.total_nodes as f64;
        }

        let mut issues = Vec::with_capacity(cycles.len() + orphans.len() + 1);
        for cycle in cycles {
            let message = format!("Cycle detected: {}", cycle);
            issues.push(DiagnosticIssue::new(IssueKind::Cycle { cycle }, message));
        }
        for id in orphans {
            issues.push(DiagnosticIssue::new(
                IssueKind::OrphanedNode { id: id.clone() },
                format!("Orphaned node: {} has no parents and no children", id),
            ));
        }
        issues.push(DiagnosticIssue::new(
            IssueKind::GraphStatistics,
            format!(
                "{} nodes, {} edges, {} roots, {} leaves, max depth {}, max breadth {}, {} cycles, {:.2} average children",
                stats.total_nodes,
                stats.total_edges,
                stats.root_count,
                stats.leaf_count,
                stats.max_depth,
                stats.max_breadth,
                stats.cycle_count,
                stats.average_children
            ),
        ));

        DiagnosticReport {
            stats,
            issues,
            snapshot_id: graph.snapshot().snapshot_id,
            generated_at: Utc::now(),
        }
    }
}
