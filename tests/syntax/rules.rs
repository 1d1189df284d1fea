//! Integration tests for rule parsing
//!
//! Tests line classification, top-level splitting, and rule shapes.

use guidelog_syntax::{
    Atom, LineKind, Literal, Rule, RuleKind, classify_line, parse_body_conditions,
    parse_choice_expression, split_top_level,
};
use proptest::prelude::*;

// =============================================================================
// Line Classification
// =============================================================================

#[test]
fn classify_rule_file_lines() {
    assert_eq!(classify_line(""), LineKind::Blank);
    assert_eq!(classify_line("% offer statins"), LineKind::Comment);
    assert_eq!(classify_line("#show fired/1."), LineKind::Directive);
    assert_eq!(
        classify_line("[1.3.2]"),
        LineKind::Marker("1.3.2".to_string())
    );
    assert_eq!(classify_line("1.3.2"), LineKind::SectionNumber);
    assert_eq!(classify_line("offer(\"A\") :- eligible."), LineKind::Rule);
    assert_eq!(classify_line(":- a, b."), LineKind::Rule);
    assert_eq!(classify_line("eligible(\"p1\")."), LineKind::Fact);
    assert_eq!(classify_line("1{a; b}1."), LineKind::Fact);
    assert_eq!(classify_line("Offer statins to adults."), LineKind::Other);
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn body_split_respects_nesting_and_quotes() {
    let conditions = parse_body_conditions("drug(X, \"a, b\"), not allergy(X, Y), 1{p; q}2");
    assert_eq!(
        conditions,
        vec![
            "drug(X, \"a, b\")".to_string(),
            "not allergy(X, Y)".to_string(),
            "1{p; q}2".to_string(),
        ]
    );
}

#[test]
fn choice_options_split_on_semicolons() {
    let choice = parse_choice_expression("1{offer(\"A\"); offer(\"B\")}2").unwrap();
    assert_eq!(choice.lower, 1);
    assert_eq!(choice.upper, 2);
    assert!(!choice.is_exact());
    assert_eq!(choice.options, vec!["offer(\"A\")", "offer(\"B\")"]);
}

// =============================================================================
// Rules
// =============================================================================

#[test]
fn rule_kinds() {
    assert_eq!(Rule::parse("h :- a.").kind, RuleKind::Normal);
    assert_eq!(Rule::parse("h.").kind, RuleKind::Fact);
    assert!(Rule::parse(":- a, b.").is_constraint());
}

#[test]
fn choice_head_atoms() {
    let rule = Rule::parse("1{offer(\"A\"); offer(\"B\")}2 :- eligible.");
    let heads: Vec<String> = rule.head_atoms().iter().map(ToString::to_string).collect();
    assert_eq!(heads, vec!["offer(\"A\")", "offer(\"B\")"]);
    assert_eq!(rule.body, vec![Literal::parse("eligible")]);
}

#[test]
fn negated_literal() {
    let literal = Literal::parse("not allergy(X)");
    assert!(literal.negated);
    assert_eq!(literal.atom(), Atom::parse("allergy(X)"));
    assert_eq!(literal.to_string(), "not allergy(X)");
}

#[test]
fn comparisons_are_not_atoms() {
    assert_eq!(Atom::parse("X >= 65"), None);
    assert_eq!(Atom::parse("T1 < T2"), None);
}

proptest! {
    #[test]
    fn terminated_atoms_are_facts(
        name in "[a-z][a-z_]{0,8}",
        args in prop::collection::vec("[a-z0-9]{1,4}", 0..4),
    ) {
        let line = if args.is_empty() {
            format!("{name}.")
        } else {
            format!("{name}({}).", args.join(","))
        };
        prop_assert_eq!(classify_line(&line), LineKind::Fact);
        let rule = Rule::parse(&line);
        prop_assert!(rule.is_fact());
        prop_assert_eq!(rule.head_atoms().len(), 1);
        prop_assert_eq!(rule.head_atoms()[0].arity(), args.len());
    }

    #[test]
    fn top_level_split_rejoins(parts in prop::collection::vec("[a-z]{1,4}(\\([a-z,]{1,6}\\))?", 1..6)) {
        let text = parts.join(", ");
        prop_assert_eq!(split_top_level(&text, ','), parts);
    }
}
