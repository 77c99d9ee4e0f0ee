//! # lineage-graph
//!
//! Cycle-safe parent/child relationship graph over documents.
//!
//! The graph answers one question:
//!
//! > Given a document, who are its **relatives**, generation by generation?
//!
//! ## Core Contract
//!
//! 1. Build a parent/child graph from a named parent field on every document
//! 2. Keep it current incrementally as documents change, move or disappear
//! 3. Answer ancestor, descendant, sibling and cousin queries that always
//!    terminate, never repeat a node and come back in a stable order
//!
//! ## Architecture
//!
//! ```text
//! DocumentSource → RelationGraph (NodeStore + CycleDetector) → RelationshipEngine
//!                        ↓
//!                  GraphValidator → DiagnosticReport
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Adjacency sets keep insertion order; traversal follows it
//! - Same documents + same parent field → identical snapshot id
//! - Cycles are reported once, whatever node they are reached from

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod source;
pub mod config;
pub mod canonical;
pub mod cycles;
pub mod graph;
pub mod engine;
pub mod diagnostics;
pub mod snapshot;

// Re-exports
pub use types::{
    CycleInfo, Direction, DocumentEvent, DocumentId, Generations, IdSet, RelationKind,
    RelationNode, RelationQuery, RelationResult,
};
pub use store::{NodeStore, ParentDiff};
pub use source::{DocumentSource, InMemoryDocumentSource};
pub use config::{ConfigError, CycleCacheConfig, GraphConfig};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use cycles::{CacheStats, CycleDetector};
pub use graph::RelationGraph;
pub use engine::RelationshipEngine;
pub use diagnostics::{
    DiagnosticIssue, DiagnosticReport, GraphDiagnostics, GraphValidator, IssueKind, Severity,
};
pub use snapshot::GraphSnapshot;

/// Schema version for snapshot ids and configuration hashes.
pub const LINEAGE_SCHEMA_VERSION: &str = "1.0.0";

/// Field read for parent references unless configured otherwise.
pub const DEFAULT_PARENT_FIELD: &str = "parent";

/// Generations returned by ancestor/descendant queries that give no depth.
pub const DEFAULT_MAX_DEPTH: usize = 5;
