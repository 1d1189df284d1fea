//! Builds a [`ProgramGraph`] from rule text.
//!
//! One rule per line. For each rule:
//! 1. Head atoms come from the choice options or the single head
//! 2. Body literals that are comparisons or `time(...)` are dropped
//! 3. Body atoms point at the head atoms (or at the choice node)
//! 4. Every pair of body atoms is remembered for a symmetric `and` edge
//!
//! The `and` edges are added once per unique pair after all rules are read.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use guidelog_foundation::{Error, Result};
use guidelog_syntax::{Atom, Literal, Rule, classify_line};
use regex::Regex;

use crate::graph::ProgramGraph;
use crate::node::{Connection, Node};

static INEQUALITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\s*[<>]=?\s*\w+").expect("inequality pattern is valid"));

/// Incremental graph builder.
#[derive(Debug, Default)]
pub struct ProgramGraphBuilder {
    graph: ProgramGraph,
    and_pairs: BTreeSet<(String, String)>,
    rules: usize,
}

impl ProgramGraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a whole rule file's text.
    #[must_use]
    pub fn from_text(text: &str) -> ProgramGraph {
        let mut builder = Self::new();
        for line in text.lines() {
            builder.add_line(line);
        }
        builder.build()
    }

    /// Reads and builds a graph from a rule file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<ProgramGraph> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::from_text(&text))
    }

    /// Adds one line. Returns true if the line carried a rule or fact.
    ///
    /// Blank lines, comments, directives, section markers, and anything that
    /// is not a rule are skipped. Malformed rules are logged and skipped.
    pub fn add_line(&mut self, line: &str) -> bool {
        if !classify_line(line).is_rule_like() {
            return false;
        }
        match Rule::try_parse(line) {
            Ok(rule) => {
                self.add_rule(&rule);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping rule");
                false
            }
        }
    }

    /// Adds one parsed rule.
    pub fn add_rule(&mut self, rule: &Rule) {
        self.rules += 1;

        let heads = rule.head_atoms();
        let body: Vec<(Atom, bool)> = rule
            .body
            .iter()
            .filter(|literal| is_graph_literal(literal))
            .filter_map(|literal| literal.atom().map(|atom| (atom, literal.negated)))
            .collect();

        for (i, (left, _)) in body.iter().enumerate() {
            for (right, _) in &body[i + 1..] {
                let (a, b) = (left.to_string(), right.to_string());
                let pair = if a <= b { (a, b) } else { (b, a) };
                self.and_pairs.insert(pair);
            }
        }

        match &rule.choice {
            Some(choice) if heads.len() > 1 => {
                let choice_node = self
                    .graph
                    .add_node(Node::choice(choice.lower, choice.upper));
                for head in heads {
                    let head_node = self.graph.add_node(Node::Predicate(head));
                    self.graph
                        .add_connection(choice_node, head_node, Connection::Choice);
                }
                for (atom, negated) in body {
                    let body_node = self.graph.add_node(Node::Predicate(atom));
                    self.graph.add_dependency(body_node, choice_node, negated);
                }
            }
            _ => {
                for head in heads {
                    let head_node = self.graph.add_node(Node::Predicate(head));
                    for (atom, negated) in &body {
                        let body_node = self.graph.add_node(Node::Predicate(atom.clone()));
                        self.graph.add_dependency(body_node, head_node, *negated);
                    }
                }
            }
        }
    }

    /// Adds the accumulated `and` edges and returns the finished graph.
    #[must_use]
    pub fn build(mut self) -> ProgramGraph {
        for (left, right) in std::mem::take(&mut self.and_pairs) {
            let (Some(left), Some(right)) = (Atom::parse(&left), Atom::parse(&right)) else {
                continue;
            };
            let a = self.graph.add_node(Node::Predicate(left));
            let b = self.graph.add_node(Node::Predicate(right));
            self.graph.add_connection(a, b, Connection::And);
            self.graph.add_connection(b, a, Connection::And);
        }

        tracing::debug!(
            rules = self.rules,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "built program graph"
        );
        self.graph
    }
}

/// Returns false for literals the graph does not represent: equalities,
/// inequalities, arithmetic comparisons, and `time(...)` literals.
fn is_graph_literal(literal: &Literal) -> bool {
    let text = literal.text.as_str();
    !(text.contains('=') || text.starts_with("time(") || INEQUALITY_PATTERN.is_match(text))
}
