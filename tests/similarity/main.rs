//! Integration tests for Layer 3: Similarity
//!
//! Tests for the adjusted graph similarity metric and its transport solvers.

mod scoring;
mod transport;
