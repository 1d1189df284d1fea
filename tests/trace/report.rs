//! Integration tests for fired-rule reports

use guidelog_foundation::RuleId;
use guidelog_trace::{
    BANNER_WIDTH, CaseOutcome, CaseResult, FiringExplainer, GuidelineLookup, RuleInstrumenter,
    SolverOutput,
};

const RULES: &str = "\
[1.1.1]
offer(\"A\") :- age(X), X >= 65.
[1.1.2]
:- offer(\"A\"), allergy(\"A\").
";

const SOLVER_OUTPUT: &str = "\
clingo version 5.6.2
=== Case 1 ===
Reading from stdin
Answer: 1
age(70) offer(\"A\") fired(\"1.1.1\") fired(\"1.1.2\") constraint_ok(\"1.1.2\")
SATISFIABLE

=== Patient 2 ===
Answer: 1
age(30) fired(\"1.1.2\")
Answer: 2
age(30) fired(\"9.9.9\")
SATISFIABLE
";

#[test]
fn parses_cases_and_answers() {
    let output = SolverOutput::parse(SOLVER_OUTPUT);
    assert_eq!(output.cases.len(), 2);
    assert_eq!(output.cases[1].case, 2);
    let CaseResult::Answers(answers) = &output.cases[1].result else {
        panic!("expected answers");
    };
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[1].fired, vec![RuleId::new("9.9.9")]);
}

#[test]
fn report_explains_each_fired_rule() {
    let instrumented = RuleInstrumenter::instrument(RULES);
    let guidelines = GuidelineLookup::parse("1.1.1 Offer A to people aged 65 and over.");
    let output = SolverOutput::parse(SOLVER_OUTPUT);
    let report = FiringExplainer::new(&instrumented.registry, &guidelines).explain(&output);

    assert_eq!(report.fired_count(), 4);
    let CaseOutcome::Answers(answers) = &report.cases[0].outcome else {
        panic!("expected answers");
    };
    let first = &answers[0].entries[0];
    assert!(first.explanation.as_deref().unwrap().contains("age >= 65"));
    assert_eq!(
        first.guideline.as_deref(),
        Some("Offer A to people aged 65 and over.")
    );

    let text = report.to_string();
    assert!(text.contains(&"-".repeat(BANNER_WIDTH)));
    assert!(text.contains("Constraint satisfied: not offer(\"A\")\nif allergy(\"A\")."));
    assert!(text.contains("Guideline 1.1.2 Natural Language:\n[not found]"));
    assert!(text.contains("Rule 9.9.9: [Rule not found]"));
}
