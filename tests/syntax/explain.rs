//! Integration tests for natural-language rendering

use guidelog_foundation::RuleId;
use guidelog_syntax::{explain_condition, explain_constraint_satisfied, explain_head, explain_rule};

#[test]
fn age_comparison_collapses() {
    let text = explain_rule("offer(\"A\") :- age(X), X >= 65.", None);
    assert!(text.contains("age >= 65"));
    assert!(!text.contains("X >= 65"));
}

#[test]
fn other_bindings_do_not_collapse() {
    let text = explain_rule("offer(\"A\") :- weight(X), X >= 65.", None);
    assert!(text.contains("weight(X) and X >= 65"));
}

#[test]
fn rule_with_id_header() {
    let id = RuleId::new("1.2.3_B");
    let text = explain_rule("refer :- suspected, not declined.", Some(&id));
    assert!(text.contains("Rule 1.2.3_B:"));
    assert!(text.contains("Case features:\nsuspected and not declined,"));
    assert!(text.ends_with("Action:\nrefer.\n"));
}

#[test]
fn choice_rendering() {
    assert_eq!(
        explain_head("1{offer(\"A\"); offer(\"B\")}1"),
        "choose exactly 1 of: offer(\"A\"), offer(\"B\")"
    );
    assert_eq!(
        explain_condition("not 1{a; b}2"),
        "not at least 1 and at most 2 of: a, b"
    );
}

#[test]
fn satisfied_constraint_with_negated_first_literal() {
    let text = explain_constraint_satisfied("not consent, treat", None);
    assert_eq!(text, "Constraint:\nConstraint satisfied: consent\nif treat.\n");
}
