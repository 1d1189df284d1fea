//! Integration tests for graph construction

use guidelog_graph::{EdgeKind, Node, ProgramGraphBuilder};
use proptest::prelude::*;

// =============================================================================
// Rules
// =============================================================================

#[test]
fn comparison_literal_filtered_from_age_rule() {
    let graph = ProgramGraphBuilder::from_text("offer(\"A\") :- age(X), X >= 65.");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.edge_kind("age(X)", "offer(\"A\")"),
        Some(EdgeKind::Regular)
    );
    assert!(!graph.contains("X >= 65"));
}

#[test]
fn choice_head_gets_synthetic_node() {
    let graph = ProgramGraphBuilder::from_text("1{offer(\"A\"); offer(\"B\")}2 :- eligible.");
    let choice = graph.node("choice_1_2").unwrap();
    assert_eq!(choice, &Node::choice(1, 2));

    assert_eq!(
        graph.edge_kind("choice_1_2", "offer(\"A\")"),
        Some(EdgeKind::Choice)
    );
    assert_eq!(
        graph.edge_kind("choice_1_2", "offer(\"B\")"),
        Some(EdgeKind::Choice)
    );
    assert_eq!(
        graph.edge_kind("eligible", "choice_1_2"),
        Some(EdgeKind::Regular)
    );
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn negation_and_conjunction() {
    let graph = ProgramGraphBuilder::from_text("treat :- diagnosed, not contraindicated.");
    assert_eq!(graph.edge_kind("diagnosed", "treat"), Some(EdgeKind::Regular));
    assert_eq!(
        graph.edge_kind("contraindicated", "treat"),
        Some(EdgeKind::Negated)
    );
    assert_eq!(
        graph.edge_kind("diagnosed", "contraindicated"),
        Some(EdgeKind::And)
    );
    assert_eq!(
        graph.edge_kind("contraindicated", "diagnosed"),
        Some(EdgeKind::And)
    );
}

#[test]
fn rule_file_with_markers_and_comments() {
    let text = "\
% Statins
[1.3.1]
offer(\"statin\") :- risk(high).
[1.3.2]
:- offer(\"statin\"), pregnant.
#show fired/1.
Offer a statin to people at high risk.
";
    let graph = ProgramGraphBuilder::from_text(text);
    let counts = graph.edge_kind_counts();
    assert_eq!(counts.regular, 1);
    assert_eq!(counts.and, 2);
    assert_eq!(graph.node_count(), 3);
}

#[test]
fn isolated_fact_nodes() {
    let graph = ProgramGraphBuilder::from_text("eligible.\nrefer :- suspected.");
    let isolated: Vec<String> = graph.isolated_nodes().map(Node::key).collect();
    assert_eq!(isolated, vec!["eligible".to_string()]);
}

proptest! {
    #[test]
    fn every_body_atom_feeds_the_head(body in prop::collection::hash_set("[a-z]{1,6}", 1..5)) {
        let body: Vec<String> = body.into_iter().filter(|b| b != "not" && b != "head").collect();
        prop_assume!(!body.is_empty());
        let graph = ProgramGraphBuilder::from_text(&format!("head :- {}.", body.join(", ")));
        for atom in &body {
            prop_assert_eq!(graph.edge_kind(atom, "head"), Some(EdgeKind::Regular));
        }
        let n = body.len();
        prop_assert_eq!(graph.edge_kind_counts().and, n * (n - 1));
    }
}
