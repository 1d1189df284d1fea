//! Rule parts, literals, atoms, and choice expressions.

use std::fmt;
use std::sync::LazyLock;

use guidelog_foundation::{Error, Result};
use regex::Regex;

use crate::tokenizer::{split_top_level, strip_terminator};
use crate::{NEGATION_PREFIX, RULE_SEPARATOR};

static CHOICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*\{([^}]+)\}\s*(\d+)").expect("choice pattern is valid")
});

// =============================================================================
// Rule Parts
// =============================================================================

/// Raw head and body text of one rule line.
///
/// | line                | head        | body        |
/// |---------------------|-------------|-------------|
/// | `:- a, b.`          | `None`      | `Some(a, b)`|
/// | `h :- a, b.`        | `Some(h)`   | `Some(a, b)`|
/// | `h.`                | `Some(h)`   | `None`      |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleParts {
    /// Head text, `None` for constraints.
    pub head: Option<String>,
    /// Body text, `None` for facts.
    pub body: Option<String>,
}

/// Splits one rule line into head and body text.
///
/// Trailing `.` terminators are stripped from whichever part ends the line.
#[must_use]
pub fn parse_rule(text: &str) -> RuleParts {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix(RULE_SEPARATOR) {
        return RuleParts {
            head: None,
            body: Some(strip_terminator(rest).to_string()),
        };
    }

    if let Some((head, body)) = text.split_once(RULE_SEPARATOR) {
        return RuleParts {
            head: Some(head.trim().to_string()),
            body: Some(strip_terminator(body).to_string()),
        };
    }

    RuleParts {
        head: Some(strip_terminator(text).to_string()),
        body: None,
    }
}

/// Splits body text into its top-level conditions.
///
/// Commas inside parentheses or quoted strings are never split points.
#[must_use]
pub fn parse_body_conditions(body: &str) -> Vec<String> {
    split_top_level(body, ',')
}

// =============================================================================
// Choice Expressions
// =============================================================================

/// A cardinality-constrained disjunction `N{opt1; opt2; ...}M`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceExpr {
    /// Minimum number of options that must hold.
    pub lower: u32,
    /// Maximum number of options that may hold.
    pub upper: u32,
    /// The options, in source order.
    pub options: Vec<String>,
}

impl ChoiceExpr {
    /// Returns true when exactly `lower` options must hold.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

/// Finds the first choice expression anywhere in `text`.
#[must_use]
pub fn parse_choice_expression(text: &str) -> Option<ChoiceExpr> {
    let captures = CHOICE_PATTERN.captures(text)?;
    let lower = captures[1].parse().ok()?;
    let upper = captures[3].parse().ok()?;
    let options = split_top_level(&captures[2], ';');
    Some(ChoiceExpr {
        lower,
        upper,
        options,
    })
}

// =============================================================================
// Atoms
// =============================================================================

/// A predicate instantiation `name(arg1, arg2, ...)` or a bare `name`.
///
/// The [`Display`](fmt::Display) form is canonical: arguments are trimmed and
/// joined with `", "`, so `p(a,b)` and `p( a , b )` render identically.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// Predicate name.
    pub name: String,
    /// Arguments as written (quotes preserved).
    pub args: Vec<String>,
}

impl Atom {
    /// Parses `text` as an atom. The whole text must be consumed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let name_len = text
            .char_indices()
            .find(|&(i, c)| !(c == '_' || c.is_alphanumeric() || (i == 0 && c == '-')))
            .map_or(text.len(), |(i, _)| i);
        let name = &text[..name_len];
        let starts_well = name
            .trim_start_matches('-')
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_');
        if !starts_well {
            return None;
        }

        let rest = text[name_len..].trim_start();
        if rest.is_empty() {
            return Some(Self {
                name: name.to_string(),
                args: Vec::new(),
            });
        }

        let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
        if !is_balanced(inner) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            args: split_top_level(inner, ','),
        })
    }

    /// Returns the arity of the predicate.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}({})", self.name, self.args.join(", "))
        }
    }
}

fn is_balanced(text: &str) -> bool {
    let mut depth: isize = 0;
    let mut quote: Option<char> = None;
    for ch in text.chars() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

// =============================================================================
// Literals
// =============================================================================

/// One body condition, with negation-as-failure split off.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    /// The condition text without any `not ` prefix.
    pub text: String,
    /// Whether the condition was prefixed with `not `.
    pub negated: bool,
}

impl Literal {
    /// Parses a single condition.
    #[must_use]
    pub fn parse(condition: &str) -> Self {
        let condition = condition.trim();
        match condition.strip_prefix(NEGATION_PREFIX) {
            Some(inner) => Self {
                text: inner.trim().to_string(),
                negated: true,
            },
            None => Self {
                text: condition.to_string(),
                negated: false,
            },
        }
    }

    /// Returns the literal as an atom, if it is one.
    #[must_use]
    pub fn atom(&self) -> Option<Atom> {
        Atom::parse(&self.text)
    }

    /// Returns the choice expression this literal carries, if any.
    #[must_use]
    pub fn choice(&self) -> Option<ChoiceExpr> {
        parse_choice_expression(&self.text)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str(NEGATION_PREFIX)?;
        }
        f.write_str(&self.text)
    }
}

// =============================================================================
// Rules
// =============================================================================

/// The shape of a parsed rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleKind {
    /// Head only.
    Fact,
    /// Head and body.
    Normal,
    /// Body only; forbids the body from holding.
    Constraint,
}

/// A parsed rule. Immutable once built from a line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// Head text, `None` for constraints.
    pub head: Option<String>,
    /// Body literals in source order.
    pub body: Vec<Literal>,
    /// Choice expression in the head, if any.
    pub choice: Option<ChoiceExpr>,
    /// Fact, normal rule, or constraint.
    pub kind: RuleKind,
}

impl Rule {
    /// Parses one rule line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let RuleParts { head, body } = parse_rule(text);
        let kind = match (&head, &body) {
            (None, _) => RuleKind::Constraint,
            (Some(_), None) => RuleKind::Fact,
            (Some(_), Some(_)) => RuleKind::Normal,
        };
        let choice = head.as_deref().and_then(parse_choice_expression);
        let body = body
            .as_deref()
            .map(|b| parse_body_conditions(b).iter().map(|c| Literal::parse(c)).collect())
            .unwrap_or_default();
        Self {
            head,
            body,
            choice,
            kind,
        }
    }

    /// Parses one rule line, rejecting unbalanced parentheses or quotes.
    ///
    /// # Errors
    ///
    /// Returns a malformed rule error naming the line.
    pub fn try_parse(text: &str) -> Result<Self> {
        if !is_balanced(text) {
            return Err(Error::malformed_rule(
                strip_terminator(text),
                "unbalanced parentheses or quotes",
            ));
        }
        Ok(Self::parse(text))
    }

    /// Returns the head atoms: the choice options for a choice head, the
    /// single head otherwise. Options that are not atoms are skipped.
    #[must_use]
    pub fn head_atoms(&self) -> Vec<Atom> {
        match (&self.choice, &self.head) {
            (Some(choice), _) => choice.options.iter().filter_map(|o| Atom::parse(o)).collect(),
            (None, Some(head)) => split_top_level(head, ';')
                .iter()
                .filter_map(|h| Atom::parse(h))
                .collect(),
            (None, None) => Vec::new(),
        }
    }

    /// Returns true for constraints.
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        self.kind == RuleKind::Constraint
    }

    /// Returns true for facts.
    #[must_use]
    pub fn is_fact(&self) -> bool {
        self.kind == RuleKind::Fact
    }
}
