//! Golden tests for the relationship graph.
//!
//! These tests pin down query results on small named graphs and check that
//! incremental maintenance agrees with a full rebuild.

use lineage_graph::{
    DocumentEvent, DocumentId, GraphConfig, InMemoryDocumentSource, IssueKind, RelationGraph,
    RelationQuery, RelationResult, Severity,
};
use tracing_subscriber::EnvFilter;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(s: &str) -> DocumentId {
    DocumentId::from(s)
}

fn names(ids: &[DocumentId]) -> Vec<&str> {
    ids.iter().map(DocumentId::as_str).collect()
}

/// Source where every listed parent also exists as a document.
fn source_of(edges: &[(&str, &[&str])]) -> InMemoryDocumentSource {
    let mut source = InMemoryDocumentSource::new();
    for (child, parents) in edges {
        source.set_parents(*child, parents);
    }
    for (_, parents) in edges {
        for parent in parents.iter() {
            source.add_document(*parent);
        }
    }
    source
}

fn build(edges: &[(&str, &[&str])]) -> RelationGraph {
    init_tracing();
    RelationGraph::from_source(&source_of(edges))
}

fn build_family_tree() -> RelationGraph {
    //            gp
    //          /    \
    //        p1      p2
    //       /  \      \
    //      a    b      c
    build(&[
        ("p1", &["gp"]),
        ("p2", &["gp"]),
        ("a", &["p1"]),
        ("b", &["p1"]),
        ("c", &["p2"]),
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// ANCESTOR / DESCENDANT SCENARIOS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chain_ancestors() {
    let graph = build(&[("A", &["B"]), ("B", &["C"]), ("C", &["D"])]);
    let ancestors = graph.relations().get_ancestors(&id("A"), Some(3));
    assert_eq!(ancestors.as_str_levels(), vec![vec!["B"], vec!["C"], vec!["D"]]);
}

#[test]
fn test_diamond_ancestors_list_shared_node_once() {
    let graph = build(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"])]);
    let ancestors = graph.relations().get_ancestors(&id("A"), Some(2));
    assert_eq!(ancestors.as_str_levels(), vec![vec!["B", "C"], vec!["D"]]);
}

#[test]
fn test_cycle_ancestors_terminate() {
    let graph = build(&[("A", &["B"]), ("B", &["C"]), ("C", &["B"])]);
    let ancestors = graph.relations().get_ancestors(&id("A"), Some(10));
    assert_eq!(ancestors.depth(), 2);
    assert_eq!(ancestors.as_str_levels(), vec![vec!["B"], vec!["C"]]);
}

#[test]
fn test_descendants_mirror_ancestors() {
    let graph = build_family_tree();
    let descendants = graph.relations().get_descendants(&id("gp"), Some(5));
    assert_eq!(
        descendants.as_str_levels(),
        vec![vec!["p1", "p2"], vec!["a", "b", "c"]]
    );
}

#[test]
fn test_queries_are_repeatable() {
    let graph = build_family_tree();
    let engine = graph.relations();
    let first = engine.get_descendants(&id("gp"), None);
    for _ in 0..100 {
        assert_eq!(engine.get_descendants(&id("gp"), None), first);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SIBLING / COUSIN SCENARIOS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_first_cousins_across_parents() {
    let graph = build(&[("P1", &["GP"]), ("P2", &["GP"]), ("A", &["P1"]), ("B", &["P2"])]);
    let cousins = graph.relations().get_cousins(&id("A"), 1);
    assert_eq!(names(&cousins), vec!["B"]);
}

#[test]
fn test_cousins_exclude_siblings() {
    let graph = build_family_tree();
    let engine = graph.relations();
    assert_eq!(names(&engine.get_siblings(&id("a"), false)), vec!["b"]);
    assert_eq!(names(&engine.get_cousins(&id("a"), 1)), vec!["c"]);
    assert_eq!(names(&engine.get_cousins(&id("c"), 1)), vec!["a", "b"]);
}

#[test]
fn test_query_envelope() {
    let graph = build_family_tree();
    let engine = graph.relations();

    let json = r#"{"kind": "cousins", "degree": 1}"#;
    let query: RelationQuery = serde_json::from_str(json).unwrap();
    assert_eq!(
        engine.query(&id("a"), &query),
        RelationResult::Flat(vec![id("c")])
    );

    let query = RelationQuery::Siblings { include_self: true };
    assert_eq!(engine.query(&id("a"), &query).len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// INCREMENTAL MAINTENANCE
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_incremental_updates_match_rebuild() {
    init_tracing();
    let mut source = source_of(&[("a", &["p1"]), ("b", &["p1"]), ("p1", &["gp"])]);
    let mut graph = RelationGraph::from_source(&source);

    source.set_parents("c", &["p1"]);
    graph.apply_event(&source, &DocumentEvent::changed("c"));

    source.set_parents("b", &["gp"]);
    graph.apply_event(&source, &DocumentEvent::changed("b"));

    source.remove_document(&id("a"));
    graph.apply_event(&source, &DocumentEvent::deleted("a"));

    let rebuilt = RelationGraph::from_source(&source);
    assert_eq!(graph.snapshot().snapshot_id, rebuilt.snapshot().snapshot_id);
    assert!(graph.store().is_consistent());
}

#[test]
fn test_rename_keeps_relationships() {
    let mut graph = build_family_tree();
    let before_children = graph.children(&id("p1")).len();
    let before_parents = graph.parents(&id("p1")).len();

    graph.rename_node(&id("parent-one"), &id("p1"));

    assert!(!graph.contains(&id("p1")));
    assert_eq!(graph.children(&id("parent-one")).len(), before_children);
    assert_eq!(graph.parents(&id("parent-one")).len(), before_parents);
    assert_eq!(graph.parents(&id("a")), &[id("parent-one")]);
    assert_eq!(graph.children(&id("gp")), &[id("parent-one"), id("p2")]);
    assert_eq!(
        names(&graph.relations().get_cousins(&id("a"), 1)),
        vec!["c"]
    );
}

#[test]
fn test_rename_onto_existing_replaces_it() {
    let mut graph = build_family_tree();
    graph.rename_node(&id("p2"), &id("p1"));

    assert!(!graph.contains(&id("p1")));
    assert!(graph.parents(&id("c")).is_empty());
    assert_eq!(graph.children(&id("p2")), &[id("a"), id("b")]);
    assert!(graph.store().is_consistent());
}

#[test]
fn test_remove_leaves_no_dangling_edges() {
    let mut graph = build_family_tree();
    graph.remove_node(&id("p1"));

    assert!(graph.parents(&id("a")).is_empty());
    assert_eq!(graph.children(&id("gp")), &[id("p2")]);
    assert!(graph.store().is_consistent());
}

// ─────────────────────────────────────────────────────────────────────────────
// CONFIGURATION AND DIAGNOSTICS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_custom_parent_field() {
    init_tracing();
    let mut source = InMemoryDocumentSource::new();
    source.set_field("a", "up", vec!["[[b]]".to_string()]);
    source.add_document("b");

    let mut graph = RelationGraph::new(GraphConfig::with_parent_field("up")).unwrap();
    graph.build(&source);
    assert_eq!(graph.parents(&id("a")), &[id("b")]);
}

#[test]
fn test_unresolved_references_produce_no_edge() {
    init_tracing();
    let mut source = InMemoryDocumentSource::new().with_document("a", &["[[nowhere]]", "b"]);
    source.add_document("b");
    let graph = RelationGraph::from_source(&source);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.parents(&id("a")), &[id("b")]);
}

#[test]
fn test_diagnostics_structure_with_shortcut_and_self_loop() {
    // a names b directly and through c; s names itself and d
    let graph = build(&[
        ("a", &["b", "c"]),
        ("c", &["b"]),
        ("b", &["d"]),
        ("s", &["s", "d"]),
    ]);
    let stats = graph.diagnostics().stats;

    assert_eq!(stats.total_nodes, 5);
    assert_eq!(stats.total_edges, 6);
    // only d has no parents; s is its own child, so only a has no children
    assert_eq!(stats.root_count, 1);
    assert_eq!(stats.leaf_count, 1);
    // a -> c -> b -> d, although d is two generations above a
    assert_eq!(stats.max_depth, 3);
    assert_eq!(
        graph.relations().get_ancestors(&id("a"), None).as_str_levels(),
        vec![vec!["b", "c"], vec!["d"]]
    );
    assert_eq!(stats.max_breadth, 2);
    assert_eq!(stats.cycle_count, 1);
}

#[test]
fn test_diagnostics_report() {
    let graph = build(&[("a", &["b"]), ("b", &["a"]), ("lonely", &[])]);
    let report = graph.diagnostics();
    report.log();

    assert!(!report.is_healthy());
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.stats.total_nodes, 3);
    assert_eq!(report.stats.total_edges, 2);
    assert_eq!(report.stats.cycle_count, 1);
    assert_eq!(report.snapshot_id, graph.snapshot().snapshot_id);

    let info: Vec<_> = report.issues_with(Severity::Info).collect();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].kind, IssueKind::GraphStatistics);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["stats"]["total_nodes"], 3);
}
