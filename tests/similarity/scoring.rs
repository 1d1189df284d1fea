//! Integration tests for graph scoring

use guidelog_graph::{EdgeKind, ProgramGraph, ProgramGraphBuilder};
use guidelog_similarity::{
    Assignment, GraphSimilarityScorer, HashedNgramEmbedder, ScoreMethod, ScorerConfig,
    structure_penalty,
};
use proptest::prelude::*;

const GROUND_TRUTH: &str = "\
offer(\"statin\") :- risk(high), not pregnant.
1{refer(\"cardiology\"); monitor}1 :- offer(\"statin\").
";

const GENERATED: &str = "\
offer(\"statin\") :- risk(high).
refer(\"cardiology\") :- offer(\"statin\"), symptomatic.
";

fn scorer() -> GraphSimilarityScorer<HashedNgramEmbedder> {
    GraphSimilarityScorer::new(HashedNgramEmbedder::new(64, 7).unwrap())
}

fn graph(text: &str) -> ProgramGraph {
    ProgramGraphBuilder::from_text(text)
}

// =============================================================================
// Properties of the Metric
// =============================================================================

#[test]
fn identical_programs_score_one() {
    let gt = graph(GROUND_TRUTH);
    let score = scorer().score(&gt, &graph(GROUND_TRUTH)).unwrap();
    assert!((score.adjusted - 1.0).abs() < 1e-9);
    assert_eq!(score.structure_penalty, 0.0);
}

#[test]
fn different_programs_score_below_one() {
    let score = scorer().score(&graph(GROUND_TRUTH), &graph(GENERATED)).unwrap();
    assert!(score.adjusted < 1.0);
    assert!(score.adjusted >= 0.0);
    assert!(score.adjusted <= score.raw);

    let choice = score.category(EdgeKind::Choice).unwrap();
    assert_eq!(choice.ground_truth_edges, 2);
    assert_eq!(choice.generated_edges, 0);
    assert_eq!(choice.method, ScoreMethod::Disjoint);
    assert_eq!(choice.similarity, 0.0);
}

#[test]
fn empty_graphs_are_vacuously_equal() {
    let empty = ProgramGraph::new();
    let score = scorer().score(&empty, &empty).unwrap();
    assert_eq!(score.adjusted, 1.0);
    assert!(
        score
            .categories
            .iter()
            .all(|c| c.method == ScoreMethod::Vacuous)
    );
}

#[test]
fn penalty_is_symmetric() {
    let a = graph(GROUND_TRUTH);
    let b = graph(GENERATED);
    assert_eq!(
        structure_penalty(&a, &b, 0.5),
        structure_penalty(&b, &a, 0.5)
    );
    assert_eq!(structure_penalty(&a, &b, 0.0), 0.0);
}

#[test]
fn unpenalized_score_equals_raw() {
    let scorer = scorer().with_config(ScorerConfig::default().with_structure_penalty_factor(0.0));
    let score = scorer.score(&graph(GROUND_TRUTH), &graph(GENERATED)).unwrap();
    assert!((score.adjusted - score.raw.clamp(0.0, 1.0)).abs() < 1e-12);
}

#[test]
fn assignment_as_primary_strategy() {
    let scorer = scorer().with_primary(Assignment);
    let gt = graph(GROUND_TRUTH);
    let score = scorer.score(&gt, &graph(GROUND_TRUTH)).unwrap();
    let regular = score.category(EdgeKind::Regular).unwrap();
    assert_eq!(regular.method, ScoreMethod::Transport("assignment".to_string()));
    assert!((score.adjusted - 1.0).abs() < 1e-9);
}

#[test]
fn compare_all_keeps_order() {
    let gt = graph(GROUND_TRUTH);
    let generated = [graph(GROUND_TRUTH), graph(GENERATED)];
    let scores = scorer().compare_all(&gt, &generated);
    assert_eq!(scores.len(), 2);
    let first = scores[0].as_ref().unwrap().adjusted;
    let second = scores[1].as_ref().unwrap().adjusted;
    assert!(first > second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn direction_does_not_matter_for_equal_sizes(
        a in prop::collection::vec("[a-z]{2,5}", 2..4),
        b in prop::collection::vec("[a-z]{2,5}", 2..4),
    ) {
        prop_assume!(a.len() == b.len());
        let left = graph(&format!("goal :- {}.", a.join(", ")));
        let right = graph(&format!("goal :- {}.", b.join(", ")));
        prop_assume!(left.node_count() == right.node_count());

        let scorer = scorer();
        let forward = scorer.score(&left, &right).unwrap();
        let backward = scorer.score(&right, &left).unwrap();
        prop_assert!((forward.adjusted - backward.adjusted).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&forward.adjusted));
    }
}
