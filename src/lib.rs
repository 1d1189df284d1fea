//! guidelog - Structural analysis of answer-set programs generated from
//! clinical guidelines
//!
//! This crate re-exports all layers of guidelog for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: guidelog_runtime    — CLI, configuration, CSV reports, solver runs
//! Layer 3: guidelog_similarity — Embeddings, optimal transport, scoring
//!          guidelog_trace      — Instrumentation, fired-rule explanations
//! Layer 2: guidelog_graph      — Typed predicate dependency graphs
//! Layer 1: guidelog_syntax     — Rule tokenizing, parsing, rendering
//! Layer 0: guidelog_foundation — Core types (RuleId, ClauseId, Error)
//! ```

pub use guidelog_foundation as foundation;
pub use guidelog_graph as graph;
pub use guidelog_runtime as runtime;
pub use guidelog_similarity as similarity;
pub use guidelog_syntax as syntax;
pub use guidelog_trace as trace;
