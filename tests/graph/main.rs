//! Integration tests for Layer 2: Graph
//!
//! Tests for building typed dependency graphs from rule text.

mod building;
mod export;
