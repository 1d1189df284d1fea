//! Cross-layer integration tests for guidelog
//!
//! Tests that verify correct interaction between multiple crates.

mod comparison;
mod firing_trace;
