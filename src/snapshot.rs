//! Graph snapshot identity.
//!
//! A snapshot id captures the structure of the graph at one point in time.
//! Two graphs with the same nodes and the same parent edges produce the same
//! id regardless of build order; any added, removed or renamed node and any
//! changed edge produces a different one.
//!
//! Computed from: sorted node ids, sorted `(child, parent)` pairs and the
//! schema version, folded through xxh64.

use std::hash::Hasher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::Xxh64;

use crate::graph::RelationGraph;
use crate::store::NodeStore;
use crate::LINEAGE_SCHEMA_VERSION;

/// Separator written between identities so `("ab", "c")` and `("a", "bc")`
/// hash differently.
const FIELD_SEPARATOR: &[u8] = &[0x1f];

/// Structural fingerprint of a relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Combined identity of nodes, edges and schema version.
    pub snapshot_id: String,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of parent edges.
    pub edge_count: usize,
    /// Schema version the id was computed under.
    pub schema_version: String,
    /// Hash over sorted node ids alone.
    pub node_id_hash: String,
    /// Hash over sorted `(child, parent)` pairs alone.
    pub edge_pair_hash: String,
    /// When the snapshot was taken. Not part of the id.
    pub computed_at: DateTime<Utc>,
}

impl GraphSnapshot {
    /// Fingerprint the current state of `graph`.
    pub fn compute(graph: &RelationGraph) -> Self {
        Self::from_store(graph.store())
    }

    /// Fingerprint a node store directly.
    pub fn from_store(store: &NodeStore) -> Self {
        let node_id_hash = hash_nodes(store);
        let edge_pair_hash = hash_edges(store);

        let mut hasher = Xxh64::new(0);
        hasher.write(LINEAGE_SCHEMA_VERSION.as_bytes());
        hasher.write(FIELD_SEPARATOR);
        hasher.write(node_id_hash.as_bytes());
        hasher.write(FIELD_SEPARATOR);
        hasher.write(edge_pair_hash.as_bytes());

        Self {
            snapshot_id: format!("{:016x}", hasher.finish()),
            node_count: store.len(),
            edge_count: store.edge_count(),
            schema_version: LINEAGE_SCHEMA_VERSION.to_string(),
            node_id_hash,
            edge_pair_hash,
            computed_at: Utc::now(),
        }
    }

    /// Whether `graph` still has the structure this snapshot was taken from.
    pub fn matches(&self, graph: &RelationGraph) -> bool {
        let current = Self::compute(graph);
        self.snapshot_id == current.snapshot_id
    }
}

fn hash_nodes(store: &NodeStore) -> String {
    // ids() iterates the BTreeMap, already sorted
    let mut hasher = Xxh64::new(0);
    for id in store.ids() {
        hasher.write(id.as_str().as_bytes());
        hasher.write(FIELD_SEPARATOR);
    }
    format!("{:016x}", hasher.finish())
}

fn hash_edges(store: &NodeStore) -> String {
    let mut pairs: Vec<_> = store.edges().collect();
    pairs.sort();

    let mut hasher = Xxh64::new(0);
    hasher.write(&(pairs.len() as u64).to_le_bytes());
    for (child, parent) in pairs {
        hasher.write(child.as_str().as_bytes());
        hasher.write(FIELD_SEPARATOR);
        hasher.write(parent.as_str().as_bytes());
        hasher.write(FIELD_SEPARATOR);
    }
    format!("{:016x}", hasher.finish())
}
