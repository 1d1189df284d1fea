//! Typed predicate dependency graphs for guidelog.
//!
//! This crate provides:
//! - [`ProgramGraph`] - Directed graph of predicate instantiations and choice nodes
//! - [`ProgramGraphBuilder`] - Builds a graph from rule text
//! - [`EdgeKind`] - The four edge categories (`regular`, `negated`, `choice`, `and`)
//!
//! # Example
//!
//! ```
//! use guidelog_graph::{EdgeKind, ProgramGraphBuilder};
//!
//! let graph = ProgramGraphBuilder::from_text("offer(\"A\") :- age(X), X >= 65.");
//! assert_eq!(graph.edge_kind("age(X)", "offer(\"A\")"), Some(EdgeKind::Regular));
//! assert!(!graph.contains("X >= 65"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod graph;
pub mod node;

pub use builder::ProgramGraphBuilder;
pub use graph::{EdgeKindCounts, GraphEdge, ProgramGraph};
pub use node::{Connection, EdgeAttrs, EdgeKind, Node};
