//! Firing traces for guideline ASP programs.
//!
//! This crate provides:
//! - [`RuleInstrumenter`] - Assigns rule ids and adds `fired/1` tracking atoms
//! - [`RuleRegistry`] - Rule id to rule text, rebuilt from instrumented files
//! - [`GuidelineLookup`] - Clause id to guideline text
//! - [`SolverOutput`] - Per-case answer sets parsed from solver output
//! - [`FiringExplainer`] - Natural-language report of which rules fired
//!
//! # Flow
//!
//! ```text
//! rules ─ instrument ─▶ program + registry
//!                          │
//!            case facts ─ solve (runtime) ─▶ solver output
//!                                               │
//!          guideline ─ lookup ──────────────▶ explain ─▶ FiringReport
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod explain;
pub mod guideline;
pub mod instrument;
pub mod registry;
pub mod solver_output;

pub use explain::{AnswerReport, CaseOutcome, CaseReport, FiredEntry, FiringExplainer, FiringReport};
pub use guideline::GuidelineLookup;
pub use instrument::{Instrumented, RuleInstrumenter};
pub use registry::RuleRegistry;
pub use solver_output::{AnswerSet, CaseOutput, CaseResult, SolverOutput};

/// Predicate recording that a rule's body held.
pub const FIRED_PREDICATE: &str = "fired";

/// Predicate recording that a constraint was checked.
pub const CONSTRAINT_OK_PREDICATE: &str = "constraint_ok";

/// Width of the `=` and `-` banners in reports and solver output files.
pub const BANNER_WIDTH: usize = 80;

/// Returns true for lines the instrumenter emits.
#[must_use]
pub fn is_tracking_line(line: &str) -> bool {
    let line = line.trim();
    line.starts_with(&format!("{FIRED_PREDICATE}("))
        || line.starts_with(&format!("{CONSTRAINT_OK_PREDICATE}("))
}
