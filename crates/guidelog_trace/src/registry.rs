//! Rule id to rule text mapping.

use std::collections::HashMap;
use std::sync::LazyLock;

use guidelog_foundation::RuleId;
use guidelog_syntax::{COMMENT_PREFIX, RULE_SEPARATOR, classify_line, parse_rule, strip_terminator};
use regex::Regex;

use crate::is_tracking_line;

static FIRED_HEAD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^fired\("([^"]+)"\)"#).expect("fired head pattern is valid"));

/// Registered rules in source order, plus the bodies of constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleRegistry {
    rules: Vec<(RuleId, String)>,
    index: HashMap<RuleId, usize>,
    constraints: HashMap<RuleId, String>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Re-registering an id replaces its text in place and
    /// forgets any constraint body recorded under it.
    pub fn insert(&mut self, id: RuleId, text: impl Into<String>) {
        let text = text.into();
        self.constraints.remove(&id);
        if let Some(&pos) = self.index.get(&id) {
            self.rules[pos].1 = text;
            return;
        }
        self.index.insert(id.clone(), self.rules.len());
        self.rules.push((id, text));
    }

    /// Registers a constraint rule and its body.
    pub fn insert_constraint(
        &mut self,
        id: RuleId,
        text: impl Into<String>,
        body: impl Into<String>,
    ) {
        self.insert(id.clone(), text);
        self.constraints.insert(id, body.into());
    }

    /// Returns the rule text registered under `id`.
    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&str> {
        self.index.get(id).map(|&pos| self.rules[pos].1.as_str())
    }

    /// Returns the body of the constraint registered under `id`.
    #[must_use]
    pub fn constraint_body(&self, id: &RuleId) -> Option<&str> {
        self.constraints.get(id).map(String::as_str)
    }

    /// Returns true if `id` names a constraint.
    #[must_use]
    pub fn is_constraint(&self, id: &RuleId) -> bool {
        self.constraints.contains_key(id)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of registered constraints.
    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Iterates over rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleId, &str)> {
        self.rules.iter().map(|(id, text)| (id, text.as_str()))
    }

    /// Rebuilds a registry from an instrumented program.
    ///
    /// A rule is any non-comment rule or fact line immediately followed by a
    /// `fired("id")` line. Lines starting with `:-` are also recorded as
    /// constraints.
    #[must_use]
    pub fn from_instrumented(text: &str) -> Self {
        let mut registry = Self::new();
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        for pair in lines.windows(2) {
            let (line, next) = (pair[0], pair[1]);
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) || is_tracking_line(line) {
                continue;
            }
            let Some(captures) = FIRED_HEAD_PATTERN.captures(next) else {
                continue;
            };
            if !classify_line(line).is_rule_like() {
                continue;
            }

            let id = RuleId::new(&captures[1]);
            if line.starts_with(RULE_SEPARATOR) {
                let body = parse_rule(line).body.unwrap_or_default();
                registry.insert_constraint(id, strip_terminator(line), body);
            } else {
                registry.insert(id, strip_terminator(line));
            }
        }

        tracing::debug!(
            rules = registry.len(),
            constraints = registry.constraint_count(),
            "rebuilt rule registry"
        );
        registry
    }
}
