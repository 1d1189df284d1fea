//! Instrument, solve, and explain with a stand-in solver
//!
//! The stand-in fires a rule when every body condition appears verbatim as a
//! fact in the program, which is enough for ground propositional programs.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use guidelog_foundation::{Error, Result};
use guidelog_runtime::{AnalysisConfig, CaseFacts, CaseRunner, Solver, pipeline, write_solver_output};
use guidelog_syntax::{parse_body_conditions, parse_rule};
use guidelog_trace::{CaseOutcome, FiringExplainer, GuidelineLookup, RuleInstrumenter, SolverOutput};

struct GroundSolver;

impl Solver for GroundSolver {
    fn name(&self) -> &str {
        "ground"
    }

    fn solve(&self, program: &Path) -> Result<String> {
        let text = fs::read_to_string(program).map_err(|e| Error::io(program, &e))?;
        let facts: HashSet<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.contains(":-") && l.ends_with('.') && !l.starts_with('#'))
            .map(|l| l.trim_end_matches('.'))
            .collect();

        let mut atoms: Vec<String> = Vec::new();
        for line in text.lines().map(str::trim) {
            if !line.starts_with("fired(") {
                continue;
            }
            let parts = parse_rule(line);
            let holds = parts.body.as_deref().is_none_or(|body| {
                parse_body_conditions(body)
                    .iter()
                    .all(|c| facts.contains(c.as_str()))
            });
            if holds {
                atoms.push(parts.head.unwrap_or_default());
            }
        }
        Ok(format!("Answer: 1\n{}\nSATISFIABLE\n", atoms.join(" ")))
    }
}

const RULES: &str = "\
[1.1.1]
refer(\"cancer\") :- suspected(\"cancer\").
[1.1.2]
offer(\"scan\") :- suspected(\"cancer\"), aged_over(40).
";

const CASES: &str = "\
**Case 1:**
suspected(\"cancer\").
**Case 2:**
suspected(\"cancer\").
aged_over(40).
";

const GUIDELINE: &str = "\
1.1.1 Refer people with suspected cancer.
1.1.2 Offer a scan to people aged over 40.
";

#[test]
fn rules_fire_per_case() {
    let instrumented = RuleInstrumenter::instrument(RULES);
    let cases = CaseFacts::parse(CASES);
    assert_eq!(cases.len(), 2);

    let runs = CaseRunner::new(GroundSolver).run_cases(&instrumented.program, &cases);
    assert!(runs.iter().all(|run| !run.is_error()));

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("clingo.txt");
    write_solver_output(&output_path, &runs).unwrap();

    let output = SolverOutput::from_file(&output_path).unwrap();
    let guidelines = GuidelineLookup::parse(GUIDELINE);
    let report = FiringExplainer::new(&instrumented.registry, &guidelines).explain(&output);

    let fired: Vec<usize> = report
        .cases
        .iter()
        .map(|case| match &case.outcome {
            CaseOutcome::Answers(answers) => answers[0].entries.len(),
            _ => 0,
        })
        .collect();
    assert_eq!(fired, vec![1, 2]);
    assert!(report.to_string().contains("Refer people with suspected cancer."));
}

#[test]
fn file_pipeline_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.txt");
    let program = dir.path().join("rules_fired.lp");
    let solver_output = dir.path().join("clingo.txt");
    let guideline = dir.path().join("guideline.txt");
    let report = dir.path().join("explanation.txt");
    fs::write(&rules, RULES).unwrap();
    fs::write(&guideline, GUIDELINE).unwrap();

    let registry = pipeline::instrument_file(&rules, &program).unwrap();
    assert_eq!(registry.len(), 2);

    let program_text = fs::read_to_string(&program).unwrap();
    let runs = CaseRunner::new(GroundSolver)
        .with_debug_case(2, dir.path())
        .run_cases(&program_text, &CaseFacts::parse(CASES));
    write_solver_output(&solver_output, &runs).unwrap();
    assert!(dir.path().join("debug_case_2.lp").is_file());
    assert!(!dir.path().join("debug_case_1.lp").exists());

    let firing = pipeline::explain_files(
        &AnalysisConfig::default(),
        &program,
        &solver_output,
        Some(guideline.as_path()),
        &report,
    )
    .unwrap();
    assert_eq!(firing.fired_count(), 3);
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("CASE 2"));
    assert!(text.contains("Offer a scan to people aged over 40."));
}

#[test]
fn missing_solver_is_recorded_per_case() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("rules_fired.lp");
    let cases = dir.path().join("cases.txt");
    let output = dir.path().join("clingo.txt");
    fs::write(&program, RuleInstrumenter::instrument(RULES).program).unwrap();
    fs::write(&cases, CASES).unwrap();

    let config = AnalysisConfig::default().with_solver_executable("guidelog-no-such-solver");
    let runs = pipeline::solve_cases(&config, &program, &cases, &output, None).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|run| run.is_error()));

    let parsed = SolverOutput::from_file(&output).unwrap();
    assert_eq!(parsed.cases.len(), 2);
    assert!(
        parsed
            .cases
            .iter()
            .all(|case| matches!(case.result, guidelog_trace::CaseResult::Error(_)))
    );
}
