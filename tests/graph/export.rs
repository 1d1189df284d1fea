//! Integration tests for graph export

use guidelog_graph::{EdgeKind, ProgramGraphBuilder};

#[test]
fn export_lists_nodes_edges_and_counts() {
    let graph = ProgramGraphBuilder::from_text("1{a; b}1 :- c.\nd.");
    let export = graph.export();

    assert_eq!(export.nodes.len(), graph.node_count());
    assert_eq!(export.edges.len(), 3);
    assert_eq!(export.counts.choice, 2);
    assert_eq!(export.counts.regular, 1);

    let choice = export.nodes.iter().find(|n| n.id == "choice_1_1").unwrap();
    assert_eq!(choice.lower_bound, Some(1));
    assert_eq!(choice.upper_bound, Some(1));
    assert!(export.nodes.iter().any(|n| n.id == "d" && n.lower_bound.is_none()));
    assert!(
        export
            .edges
            .iter()
            .any(|e| e.source == "c" && e.target == "choice_1_1" && e.kind == EdgeKind::Regular)
    );
}

#[test]
fn from_file_reads_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.lp");
    std::fs::write(&path, "refer :- suspected.\n").unwrap();
    let graph = ProgramGraphBuilder::from_file(&path).unwrap();
    assert_eq!(graph.edge_count(), 1);
}
