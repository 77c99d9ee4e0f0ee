//! The relationship graph.
//!
//! Owns the node store, the cycle detector and the validator. Built once from
//! a [`DocumentSource`], then kept current through incremental updates driven
//! by the host's change notifications.

use crate::config::{ConfigError, GraphConfig};
use crate::cycles::{CacheStats, CycleDetector};
use crate::diagnostics::{DiagnosticReport, GraphValidator};
use crate::snapshot::GraphSnapshot;
use crate::source::DocumentSource;
use crate::store::NodeStore;
use crate::types::{CycleInfo, DocumentEvent, DocumentId, RelationNode};

/// Directed parent/child graph over documents.
///
/// ## Consistency
///
/// Every mutation keeps `Y ∈ X.parents ⇔ X ∈ Y.children` and clears the
/// cycle cache. Mutations take `&mut self`; queries take `&self` and may
/// run concurrently with each other but not with a mutation.
#[derive(Debug)]
pub struct RelationGraph {
    store: NodeStore,
    config: GraphConfig,
    cycles: CycleDetector,
    validator: GraphValidator,
}

impl Default for RelationGraph {
    fn default() -> Self {
        Self::from_valid_config(GraphConfig::default())
    }
}

impl RelationGraph {
    /// Create an empty graph with a validated configuration.
    pub fn new(config: GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GraphConfig) -> Self {
        let cycles = CycleDetector::new(&config.cycle_cache);
        Self {
            store: NodeStore::new(),
            config,
            cycles,
            validator: GraphValidator::new(),
        }
    }

    /// Create a graph with default configuration and build it from `source`.
    pub fn from_source<S: DocumentSource + ?Sized>(source: &S) -> Self {
        let mut graph = Self::default();
        graph.build(source);
        graph
    }

    /// Rebuild the whole graph from `source`.
    ///
    /// Creates a node per document, then links every resolved parent
    /// reference. Documents are processed in source order, which fixes the
    /// order of every children set.
    pub fn build<S: DocumentSource + ?Sized>(&mut self, source: &S) {
        self.store.clear();
        self.cycles.invalidate();

        let documents = source.list_documents();
        for doc in &documents {
            self.store.ensure(doc);
        }
        for doc in &documents {
            let parents = source.resolved_parents(doc, &self.config.parent_field);
            self.store.set_parents(doc, &parents);
        }

        tracing::info!(
            nodes = self.store.len(),
            edges = self.store.edge_count(),
            parent_field = %self.config.parent_field,
            "relation graph built"
        );
    }

    /// Re-read `doc`'s parent field and apply the difference.
    ///
    /// Creates the node if it is new. The node's children are never touched.
    pub fn update_node<S: DocumentSource + ?Sized>(&mut self, source: &S, doc: &DocumentId) {
        let parents = source.resolved_parents(doc, &self.config.parent_field);
        let diff = self.store.set_parents(doc, &parents);
        if diff.created || !diff.is_empty() {
            self.cycles.invalidate();
        }
        tracing::debug!(
            doc = %doc,
            created = diff.created,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "node updated"
        );
    }

    /// Move the node at `old_id` to `new_id`, keeping every relationship.
    ///
    /// If `new_id` already exists, that node is removed first together with
    /// all of its edges, including any edge it shared with `old_id`. Those
    /// relationships are not carried over. No-op if `old_id` is absent.
    pub fn rename_node(&mut self, new_id: &DocumentId, old_id: &DocumentId) {
        if !self.store.contains(old_id) || new_id == old_id {
            return;
        }
        if self.store.contains(new_id) {
            tracing::warn!(
                old = %old_id,
                new = %new_id,
                "rename target already exists; replacing it"
            );
        }
        self.store.rename(old_id, new_id);
        self.cycles.invalidate();
        tracing::debug!(old = %old_id, new = %new_id, "node renamed");
    }

    /// Remove `id` and de-reference it from its neighbors. No-op if absent.
    pub fn remove_node(&mut self, id: &DocumentId) {
        if let Some(node) = self.store.remove(id) {
            self.cycles.invalidate();
            tracing::debug!(
                doc = %id,
                parents = node.parents.len(),
                children = node.children.len(),
                "node removed"
            );
        }
    }

    /// Route a host change notification to the matching mutation.
    pub fn apply_event<S: DocumentSource + ?Sized>(&mut self, source: &S, event: &DocumentEvent) {
        match event {
            DocumentEvent::Changed { id } => self.update_node(source, id),
            DocumentEvent::Renamed { id, old_id } => self.rename_node(id, old_id),
            DocumentEvent::Deleted { id } => self.remove_node(id),
        }
    }

    /// Set the default traversal depth. Stored data is unchanged.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.config.max_depth = max_depth;
    }

    /// Default traversal depth.
    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    /// Track a different parent field and rebuild from `source`.
    pub fn set_parent_field<S: DocumentSource + ?Sized>(
        &mut self,
        source: &S,
        field: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(ConfigError::EmptyParentField);
        }
        tracing::info!(from = %self.config.parent_field, to = %field, "parent field changed");
        self.config.parent_field = field;
        self.build(source);
        Ok(())
    }

    /// Tracked parent field name.
    pub fn parent_field(&self) -> &str {
        &self.config.parent_field
    }

    /// Current configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Parents of `id` in stored order; empty if absent.
    pub fn parents(&self, id: &DocumentId) -> &[DocumentId] {
        self.store.parents(id)
    }

    /// Children of `id` in stored order; empty if absent.
    pub fn children(&self, id: &DocumentId) -> &[DocumentId] {
        self.store.children(id)
    }

    /// Every document identity in the graph, sorted.
    pub fn all_files(&self) -> Vec<&DocumentId> {
        self.store.ids().collect()
    }

    /// Whether `id` is in the graph.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.store.contains(id)
    }

    /// Node record for `id`.
    pub fn node(&self, id: &DocumentId) -> Option<&RelationNode> {
        self.store.get(id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// Number of parent edges.
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Read access to the node store.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// A cycle reachable from `id` along parent edges.
    pub fn detect_cycle(&self, id: &DocumentId) -> Option<CycleInfo> {
        self.cycles.detect_cycle(&self.store, id)
    }

    /// Every distinct cycle in the graph.
    pub fn all_cycles(&self) -> Vec<CycleInfo> {
        self.cycles.all_cycles(&self.store)
    }

    /// Whether cycle detection is available for this graph.
    pub fn supports_cycle_detection(&self) -> bool {
        self.cycles.supports_cycle_detection()
    }

    /// Cycle cache statistics, `None` when the cache is disabled.
    pub fn cycle_cache_stats(&self) -> Option<CacheStats> {
        self.cycles.cache_stats()
    }

    /// Structural health report.
    pub fn diagnostics(&self) -> DiagnosticReport {
        self.validator.validate(self)
    }

    /// Deterministic fingerprint of the current graph state.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::compute(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryDocumentSource;

    fn id(s: &str) -> DocumentId {
        DocumentId::from(s)
    }

    fn family() -> InMemoryDocumentSource {
        InMemoryDocumentSource::new()
            .with_document("a", &["b"])
            .with_document("b", &["c"])
            .with_document("c", &[])
            .with_document("d", &["c", "missing"])
    }

    #[test]
    fn test_build() {
        let graph = RelationGraph::from_source(&family());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.parents(&id("a")), &[id("b")]);
        assert_eq!(graph.children(&id("c")), &[id("b"), id("d")]);
        assert_eq!(graph.all_files(), vec!["a", "b", "c", "d"]);
        assert!(graph.store().is_consistent());
    }

    #[test]
    fn test_build_is_repeatable() {
        let source = family();
        let mut graph = RelationGraph::from_source(&source);
        let before = graph.snapshot().snapshot_id;
        graph.build(&source);
        assert_eq!(graph.snapshot().snapshot_id, before);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_update_adds_and_removes_parents() {
        let mut source = family();
        let mut graph = RelationGraph::from_source(&source);

        source.set_parents("a", &["c", "d"]);
        graph.update_node(&source, &id("a"));

        assert_eq!(graph.parents(&id("a")), &[id("c"), id("d")]);
        assert!(graph.children(&id("b")).is_empty());
        assert_eq!(graph.children(&id("c")), &[id("b"), id("d"), id("a")]);
        assert_eq!(graph.children(&id("d")), &[id("a")]);
        assert!(graph.store().is_consistent());
    }

    #[test]
    fn test_update_creates_new_node() {
        let mut source = family();
        let mut graph = RelationGraph::from_source(&source);

        source.set_parents("e", &["a"]);
        graph.update_node(&source, &id("e"));

        assert!(graph.contains(&id("e")));
        assert_eq!(graph.children(&id("a")), &[id("e")]);
    }

    #[test]
    fn test_update_preserves_children() {
        let mut source = family();
        let mut graph = RelationGraph::from_source(&source);

        source.set_parents("b", &[]);
        graph.update_node(&source, &id("b"));

        assert!(graph.parents(&id("b")).is_empty());
        assert_eq!(graph.children(&id("b")), &[id("a")]);
    }

    #[test]
    fn test_rename_and_remove() {
        let mut graph = RelationGraph::from_source(&family());

        graph.rename_node(&id("B"), &id("b"));
        assert!(!graph.contains(&id("b")));
        assert_eq!(graph.parents(&id("a")), &[id("B")]);
        assert_eq!(graph.children(&id("c")), &[id("B"), id("d")]);

        graph.remove_node(&id("c"));
        assert!(graph.parents(&id("B")).is_empty());
        assert!(graph.parents(&id("d")).is_empty());
        assert_eq!(graph.node_count(), 3);

        // absent identities are no-ops
        graph.remove_node(&id("c"));
        graph.rename_node(&id("x"), &id("ghost"));
        assert_eq!(graph.node_count(), 3);
        assert!(graph.store().is_consistent());
    }

    #[test]
    fn test_rename_onto_neighbor_drops_shared_edge() {
        let mut graph = RelationGraph::from_source(&family());

        // b's parent c is replaced, so the b -> c edge goes with it
        graph.rename_node(&id("c"), &id("b"));

        assert!(!graph.contains(&id("b")));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.parents(&id("a")), &[id("c")]);
        assert!(graph.parents(&id("c")).is_empty());
        assert_eq!(graph.children(&id("c")), &[id("a")]);
        assert!(graph.parents(&id("d")).is_empty());
        assert!(graph.store().is_consistent());
    }

    #[test]
    fn test_apply_event() {
        let mut source = family();
        let mut graph = RelationGraph::from_source(&source);

        source.set_parents("c", &["a"]);
        graph.apply_event(&source, &DocumentEvent::changed("c"));
        assert!(graph.detect_cycle(&id("a")).is_some());

        graph.apply_event(&source, &DocumentEvent::deleted("b"));
        assert!(graph.detect_cycle(&id("a")).is_none());

        graph.apply_event(&source, &DocumentEvent::renamed("z", "d"));
        assert_eq!(graph.children(&id("c")), &[id("z")]);
    }

    #[test]
    fn test_cycle_cache_invalidated_on_mutation() {
        let mut source = InMemoryDocumentSource::new()
            .with_document("a", &["b"])
            .with_document("b", &["a"]);
        let mut graph = RelationGraph::from_source(&source);

        assert!(graph.detect_cycle(&id("a")).is_some());
        assert_eq!(graph.cycle_cache_stats().unwrap().len, 1);

        source.set_parents("b", &[]);
        graph.update_node(&source, &id("b"));
        assert_eq!(graph.cycle_cache_stats().unwrap().len, 0);
        assert!(graph.detect_cycle(&id("a")).is_none());
    }

    #[test]
    fn test_set_parent_field_rebuilds() {
        let mut source = family();
        source.set_field("a", "up", vec!["d".to_string()]);
        let mut graph = RelationGraph::from_source(&source);

        graph.set_parent_field(&source, "up").unwrap();
        assert_eq!(graph.parent_field(), "up");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.parents(&id("a")), &[id("d")]);

        assert!(matches!(
            graph.set_parent_field(&source, ""),
            Err(ConfigError::EmptyParentField)
        ));
        assert_eq!(graph.parent_field(), "up");
    }

    #[test]
    fn test_new_validates_config() {
        assert!(RelationGraph::new(GraphConfig::with_parent_field("")).is_err());
        let graph = RelationGraph::new(GraphConfig::default().max_depth(2)).unwrap();
        assert_eq!(graph.max_depth(), 2);
    }

    #[test]
    fn test_set_max_depth() {
        let mut graph = RelationGraph::from_source(&family());
        let edges = graph.edge_count();
        graph.set_max_depth(12);
        assert_eq!(graph.max_depth(), 12);
        assert_eq!(graph.edge_count(), edges);
        assert!(graph.supports_cycle_detection());
    }
}
