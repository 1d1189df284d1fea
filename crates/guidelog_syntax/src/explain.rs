//! Natural-language rendering of rules and conditions.
//!
//! Rendering is deliberately literal: predicates are shown as written, and
//! only negation, choice expressions, and one narrow comparison pattern are
//! rephrased.

use std::sync::LazyLock;

use guidelog_foundation::RuleId;
use regex::Regex;

use crate::NEGATION_PREFIX;
use crate::rule::{RuleParts, parse_body_conditions, parse_choice_expression, parse_rule};

/// Fields whose `field(X), X <op> N` pairs collapse to `field <op> N`.
pub const COLLAPSIBLE_FIELDS: &[&str] = &["age"];

/// Separator line printed above each rendered rule.
pub const RULE_SEPARATOR_LINE: &str =
    "................................................................................";

static BINDING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\(([^)]+)\)").expect("binding pattern is valid"));

static COMPARISON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s*(>=|<=|!=|==|>|<|=)\s*(\d+)$").expect("comparison pattern is valid")
});

// =============================================================================
// Conditions and Heads
// =============================================================================

/// Renders a single condition.
#[must_use]
pub fn explain_condition(condition: &str) -> String {
    let condition = condition.trim();

    if let Some(inner) = condition.strip_prefix(NEGATION_PREFIX) {
        return format!("not {}", explain_condition(inner));
    }

    if let Some(choice) = parse_choice_expression(condition) {
        let options = explain_options(&choice.options);
        return if choice.is_exact() {
            format!("exactly {} of: {options}", choice.lower)
        } else {
            format!(
                "at least {} and at most {} of: {options}",
                choice.lower, choice.upper
            )
        };
    }

    condition.to_string()
}

/// Renders a rule head.
#[must_use]
pub fn explain_head(head: &str) -> String {
    let head = head.trim();
    if head.is_empty() {
        return String::new();
    }

    if let Some(choice) = parse_choice_expression(head) {
        let options = explain_options(&choice.options);
        return if choice.is_exact() {
            format!("choose exactly {} of: {options}", choice.lower)
        } else {
            format!(
                "choose at least {} and at most {} of: {options}",
                choice.lower, choice.upper
            )
        };
    }

    head.to_string()
}

fn explain_options(options: &[String]) -> String {
    options
        .iter()
        .map(|o| explain_condition(o))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a list of conditions, collapsing `age(X), X >= 65` into
/// `age >= 65`.
#[must_use]
pub fn explain_conditions(conditions: &[String]) -> Vec<String> {
    let mut explained = Vec::with_capacity(conditions.len());
    let mut i = 0;
    while i < conditions.len() {
        let collapsed = conditions
            .get(i + 1)
            .and_then(|next| collapse_comparison(&conditions[i], next));
        if let Some(collapsed) = collapsed {
            explained.push(collapsed);
            i += 2;
            continue;
        }
        explained.push(explain_condition(&conditions[i]));
        i += 1;
    }
    explained
}

fn collapse_comparison(binding: &str, comparison: &str) -> Option<String> {
    let binding = BINDING_PATTERN.captures(binding.trim())?;
    let comparison = COMPARISON_PATTERN.captures(comparison.trim())?;
    if binding[2].trim() != &comparison[1] {
        return None;
    }
    let field = &binding[1];
    if !COLLAPSIBLE_FIELDS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(field))
    {
        return None;
    }
    Some(format!(
        "{} {} {}",
        field.to_lowercase(),
        &comparison[2],
        &comparison[3]
    ))
}

// =============================================================================
// Rules
// =============================================================================

fn header(rule_id: Option<&RuleId>, fallback: &str) -> String {
    match rule_id {
        Some(id) => format!("{RULE_SEPARATOR_LINE}\nRule {id}:"),
        None => format!("{fallback}:"),
    }
}

/// Renders a whole rule.
///
/// Normal rules read as "case features ... action ...", facts as a bare
/// action, and constraints as a set of conditions that cannot all hold.
#[must_use]
pub fn explain_rule(rule_text: &str, rule_id: Option<&RuleId>) -> String {
    let RuleParts { head, body } = parse_rule(rule_text);
    let conditions = body.as_deref().map(parse_body_conditions).unwrap_or_default();
    let features = explain_conditions(&conditions).join(" and ");

    match (head, body) {
        (None, _) => format!(
            "{}\nCase features: {features},\nConstraint: the following conditions cannot all be true.\n",
            header(rule_id, "Constraint")
        ),
        (Some(head), None) => format!(
            "{}\nAction:\n{}.\n",
            header(rule_id, "Fact"),
            explain_head(&head)
        ),
        (Some(head), Some(_)) => format!(
            "{}\nCase features:\n{features},\nAction:\n{}.\n",
            header(rule_id, "Rule"),
            explain_head(&head)
        ),
    }
}

/// Renders a constraint that held in an answer set.
///
/// The first literal becomes the head: negated when positive, asserted when
/// it was a `not` literal. The remaining literals form the "if" clause.
#[must_use]
pub fn explain_constraint_satisfied(body: &str, rule_id: Option<&RuleId>) -> String {
    let conditions = parse_body_conditions(body);
    let Some((first, rest)) = conditions.split_first() else {
        return format!(
            "{}\nConstraint satisfied: (empty constraint).\n",
            header(rule_id, "Constraint")
        );
    };

    let head = match first.strip_prefix(NEGATION_PREFIX) {
        Some(inner) => explain_condition(inner),
        None => format!("not {}", explain_condition(first)),
    };

    if rest.is_empty() {
        format!(
            "{}\nConstraint satisfied: {head}.\n",
            header(rule_id, "Constraint")
        )
    } else {
        format!(
            "{}\nConstraint satisfied: {head}\nif {}.\n",
            header(rule_id, "Constraint"),
            explain_conditions(rest).join(" and ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_prefix() {
        assert_eq!(explain_condition("not allergy(X)"), "not allergy(X)");
    }

    #[test]
    fn exact_choice_condition() {
        assert_eq!(
            explain_condition("1{a; not b}1"),
            "exactly 1 of: a, not b"
        );
    }

    #[test]
    fn ranged_choice_head() {
        assert_eq!(
            explain_head(r#"1{offer("A"); offer("B")}2"#),
            r#"choose at least 1 and at most 2 of: offer("A"), offer("B")"#
        );
    }

    #[test]
    fn empty_head() {
        assert_eq!(explain_head("  "), "");
    }

    #[test]
    fn age_comparison_collapses() {
        let conditions = vec!["age(X)".to_string(), "X >= 65".to_string()];
        assert_eq!(explain_conditions(&conditions), vec!["age >= 65"]);
    }

    #[test]
    fn other_fields_do_not_collapse() {
        let conditions = vec!["weight(X)".to_string(), "X > 100".to_string()];
        assert_eq!(explain_conditions(&conditions), vec!["weight(X)", "X > 100"]);
    }

    #[test]
    fn collapse_requires_same_variable() {
        let conditions = vec!["age(X)".to_string(), "Y >= 65".to_string()];
        assert_eq!(explain_conditions(&conditions), vec!["age(X)", "Y >= 65"]);
    }

    #[test]
    fn explain_normal_rule() {
        let text = explain_rule(r#"offer("A") :- age(X), X >= 65, not frail."#, None);
        assert!(text.starts_with("Rule:"));
        assert!(text.contains("age >= 65 and not frail"));
        assert!(text.contains(r#"Action:
offer("A")."#));
    }

    #[test]
    fn explain_rule_with_id() {
        let id = RuleId::new("1.1.14_B");
        let text = explain_rule("refer :- suspected.", Some(&id));
        assert!(text.starts_with(RULE_SEPARATOR_LINE));
        assert!(text.contains("Rule 1.1.14_B:"));
    }

    #[test]
    fn explain_fact() {
        let text = explain_rule("1{a; b}1.", None);
        assert!(text.starts_with("Fact:"));
        assert!(text.contains("choose exactly 1 of: a, b."));
    }

    #[test]
    fn explain_constraint() {
        let text = explain_rule(":- drug(X), allergy(X).", None);
        assert!(text.contains("drug(X) and allergy(X)"));
        assert!(text.contains("cannot all be true"));
    }

    #[test]
    fn constraint_satisfied_negates_first_literal() {
        let text = explain_constraint_satisfied("drug(X), allergy(X)", None);
        assert!(text.contains("Constraint satisfied: not drug(X)\nif allergy(X)."));
    }

    #[test]
    fn constraint_satisfied_asserts_negated_first_literal() {
        let text = explain_constraint_satisfied("not consented, treat", None);
        assert!(text.contains("Constraint satisfied: consented\nif treat."));
    }

    #[test]
    fn constraint_satisfied_single_literal() {
        let text = explain_constraint_satisfied("pregnant", None);
        assert!(text.contains("Constraint satisfied: not pregnant."));
    }
}
