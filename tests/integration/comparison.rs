//! Compare generated rule files and append the CSV report

use std::fs;

use guidelog_runtime::{AnalysisConfig, REPORT_HEADER, pipeline};

const GROUND_TRUTH: &str = "\
[1.1.1]
offer(\"statin\") :- risk(high), not pregnant.
[1.1.2]
1{refer(\"lipid_clinic\"); monitor}1 :- offer(\"statin\"), intolerant.
";

const CLOSE: &str = "\
offer(\"statin\") :- risk(high), not pregnant.
1{refer(\"lipid_clinic\"); monitor}1 :- offer(\"statin\").
";

const FAR: &str = "\
discharge :- healthy.
";

#[test]
fn closer_program_scores_higher() {
    let dir = tempfile::tempdir().unwrap();
    let gt = dir.path().join("ground_truth.lp");
    let close = dir.path().join("close.lp");
    let far = dir.path().join("far.lp");
    fs::write(&gt, GROUND_TRUTH).unwrap();
    fs::write(&close, CLOSE).unwrap();
    fs::write(&far, FAR).unwrap();

    let config = AnalysisConfig::quick().with_experiment("In-Context");
    let scores = pipeline::compare_files(&config, &gt, &[close, far]).unwrap();
    let close_score = scores[0].as_ref().unwrap();
    let far_score = scores[1].as_ref().unwrap();
    assert!(close_score.adjusted > far_score.adjusted);
    assert!(far_score.structure_penalty > close_score.structure_penalty);
}

#[test]
fn repeated_runs_append_to_one_report() {
    let dir = tempfile::tempdir().unwrap();
    let gt = dir.path().join("ground_truth.lp");
    let generated = dir.path().join("generated.lp");
    let report = dir.path().join("results").join("adjacency.csv");
    fs::write(&gt, GROUND_TRUTH).unwrap();
    fs::write(&generated, GROUND_TRUTH).unwrap();

    let first = AnalysisConfig::quick().with_experiment("D2K-Pipeline");
    let second = AnalysisConfig::quick();
    pipeline::compare_and_report(&first, &gt, &[generated.clone()], &report).unwrap();
    pipeline::compare_and_report(&second, &gt, &[generated.clone(), generated], &report).unwrap();

    let text = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], REPORT_HEADER);
    assert_eq!(lines[1..], ["D2K-Pipeline,1", "Unknown,1", "Unknown,1"]);
}

#[test]
fn json_graph_description() {
    let dir = tempfile::tempdir().unwrap();
    let gt = dir.path().join("ground_truth.lp");
    fs::write(&gt, GROUND_TRUTH).unwrap();

    let json = pipeline::describe_graph(&gt, &AnalysisConfig::default().with_json_output(true)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["counts"]["negated"], 1);
    assert_eq!(value["counts"]["choice"], 2);
    assert!(
        value["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["id"] == "choice_1_1" && n["lower_bound"] == 1)
    );
}
