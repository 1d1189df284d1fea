//! Integration tests for Layer 1: Syntax
//!
//! Tests for line classification, rule parsing, and natural-language rendering.

mod explain;
mod rules;
