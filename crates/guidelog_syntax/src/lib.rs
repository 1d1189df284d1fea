//! Rule-line grammar for the restricted ASP dialect used by guidelog.
//!
//! Every analysis pass re-parses rule text line by line:
//!
//! ```text
//! "1{offer(\"A\"); offer(\"B\")}2 :- age(X), X >= 65."
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ LINE            │  → Rule (vs. comment, marker, directive, blank)
//! │ CLASSIFICATION  │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ RULE PARTS      │  → head: 1{offer("A"); offer("B")}2
//! │                 │    body: age(X), X >= 65
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TOP-LEVEL       │  → ["age(X)", "X >= 65"]
//! │ TOKENIZER       │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ RULE VALUE      │  → Rule { choice: 1..2, body: [age(X), X >= 65] }
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Paren/quote-aware splitting shared by every consumer
//! - [`line`] - Classification of raw lines (rules, facts, markers, comments)
//! - [`rule`] - Rule parts, literals, atoms, and choice expressions
//! - [`explain`] - Natural-language rendering of rules and conditions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod explain;
pub mod line;
pub mod rule;
pub mod tokenizer;

pub use explain::{explain_condition, explain_constraint_satisfied, explain_head, explain_rule};
pub use line::{LineKind, classify_line};
pub use rule::{
    Atom, ChoiceExpr, Literal, Rule, RuleKind, RuleParts, parse_body_conditions,
    parse_choice_expression, parse_rule,
};
pub use tokenizer::{split_top_level, strip_terminator};

/// Token separating a rule head from its body.
pub const RULE_SEPARATOR: &str = ":-";

/// Prefix marking a comment line.
pub const COMMENT_PREFIX: char = '%';

/// Prefix marking negation-as-failure on a body literal.
pub const NEGATION_PREFIX: &str = "not ";
