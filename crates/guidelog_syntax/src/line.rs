//! Classification of raw rule-file lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{Atom, parse_choice_expression};
use crate::tokenizer::{split_top_level, strip_terminator};
use crate::{COMMENT_PREFIX, RULE_SEPARATOR};

static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([\d.]+)\]").expect("marker pattern is valid"));

static SECTION_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("section pattern is valid"));

/// What a single line of a rule file holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    /// Starts with `%`.
    Comment,
    /// Solver directive such as `#show fired/1.`
    Directive,
    /// A `[1.2.3]` section marker, carrying the number.
    Marker(String),
    /// A bare section number such as `1.2.3`.
    SectionNumber,
    /// A rule or constraint (contains `:-`).
    Rule,
    /// A terminated fact whose head is an atom, a disjunction of atoms, or a
    /// choice expression.
    Fact,
    /// Anything else (prose, malformed text). Skipped by every consumer.
    Other,
}

impl LineKind {
    /// Returns true for lines that carry a rule or fact.
    #[must_use]
    pub fn is_rule_like(&self) -> bool {
        matches!(self, Self::Rule | Self::Fact)
    }
}

/// Classifies one line.
#[must_use]
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();

    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(COMMENT_PREFIX) {
        return LineKind::Comment;
    }
    if line.starts_with('#') {
        return LineKind::Directive;
    }
    if let Some(captures) = MARKER_PATTERN.captures(line) {
        return LineKind::Marker(captures[1].to_string());
    }
    if SECTION_NUMBER_PATTERN.is_match(line) {
        return LineKind::SectionNumber;
    }
    if line.contains(RULE_SEPARATOR) {
        return LineKind::Rule;
    }
    if line.ends_with('.') && is_fact_head(strip_terminator(line)) {
        return LineKind::Fact;
    }
    LineKind::Other
}

fn is_fact_head(head: &str) -> bool {
    if parse_choice_expression(head).is_some() {
        return true;
    }
    let parts = split_top_level(head, ';');
    !parts.is_empty() && parts.iter().all(|p| Atom::parse(p).is_some())
}
