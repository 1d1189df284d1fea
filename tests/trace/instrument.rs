//! Integration tests for rule instrumentation

use guidelog_foundation::RuleId;
use guidelog_trace::{RuleInstrumenter, RuleRegistry};
use proptest::prelude::*;

#[test]
fn constraint_gets_fired_and_checked_atoms() {
    let out = RuleInstrumenter::instrument("[1.4.2]\n:- drug(X), allergy(X).");
    let lines: Vec<&str> = out.program.lines().collect();
    assert_eq!(
        &lines[..4],
        &[
            "% [1.4.2]",
            ":- drug(X), allergy(X).",
            "fired(\"1.4.2\").",
            "constraint_ok(\"1.4.2\").",
        ]
    );
    let id = RuleId::new("1.4.2");
    assert_eq!(out.registry.constraint_body(&id), Some("drug(X), allergy(X)"));
    assert!(out.registry.is_constraint(&id));
}

#[test]
fn rule_fires_on_its_body() {
    let out = RuleInstrumenter::instrument("[1.1.1]\noffer(\"A\") :- age(X), X >= 65.");
    assert!(
        out.program
            .contains("offer(\"A\") :- age(X), X >= 65.\nfired(\"1.1.1\") :- age(X), X >= 65.")
    );
}

#[test]
fn show_directives_close_the_program() {
    let out = RuleInstrumenter::instrument("a :- b.");
    assert!(out.program.ends_with("\n\n#show fired/1.\n#show constraint_ok/1."));
}

#[test]
fn comments_and_prose_pass_through() {
    let out = RuleInstrumenter::instrument("% note\nOffer statins.\n[2.1]\nx :- y.");
    assert!(out.program.starts_with("% note\nOffer statins.\n% [2.1]\nx :- y.\n"));
    assert_eq!(out.registry.len(), 1);
}

#[test]
fn registry_rebuilt_from_program() {
    let text = "[1.1.1]\na :- b.\n:- a, c.\n[1.1.2]\nd.\n1{e; f}1 :- d.";
    let out = RuleInstrumenter::instrument(text);
    let rebuilt = RuleRegistry::from_instrumented(&out.program);
    assert_eq!(rebuilt, out.registry);
    assert_eq!(rebuilt.len(), 4);
    assert_eq!(rebuilt.constraint_count(), 1);
}

proptest! {
    #[test]
    fn every_fact_is_tracked(facts in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..8)) {
        let text = facts.iter().map(|f| format!("{f}.")).collect::<Vec<_>>().join("\n");
        let out = RuleInstrumenter::instrument(&text);
        prop_assert_eq!(out.registry.len(), facts.len());
        for i in 1..=facts.len() {
            let tracking = format!("fired(\"unnamed_{i}\").");
            prop_assert!(out.program.contains(&tracking));
        }
    }
}
