//! Integration tests for Layer 3: Trace
//!
//! Tests for instrumentation, solver output parsing, guideline lookup, and
//! fired-rule reports.

mod guideline;
mod instrument;
mod report;
