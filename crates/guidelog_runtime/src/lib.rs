//! Command-line pipeline for guidelog.
//!
//! This crate provides:
//! - [`AnalysisConfig`] - Settings shared by every subcommand
//! - [`pipeline`] - File-to-file operations behind the CLI
//! - [`SimilarityReport`] - Appendable CSV report of comparison results
//! - [`Solver`] / [`CaseRunner`] - Per-case answer-set solving
//!
//! # Tracing Pipeline
//!
//! ```text
//! rules.txt ─ instrument ─ rules_fired.lp ─┐
//!                                          ├─ solve ─ clingo.txt ─ explain ─ report
//! cases.txt ───────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod pipeline;
pub mod report;
pub mod solver;

pub use config::AnalysisConfig;
pub use report::{REPORT_HEADER, SimilarityReport, SimilarityRow};
pub use solver::{
    CaseFacts, CaseRun, CaseRunner, Clingo, Solver, case_program, render_solver_output,
    write_solver_output,
};
