//! The program graph.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::node::{Connection, EdgeAttrs, EdgeKind, Node};

/// A directed graph of predicate dependencies.
///
/// Node identity is [`Node::key`]: adding a node whose key already exists
/// returns the existing node. There is at most one edge per ordered
/// `(source, target)` pair.
#[derive(Clone, Debug, Default)]
pub struct ProgramGraph {
    graph: DiGraph<Node, EdgeAttrs>,
    index: HashMap<String, NodeIndex>,
}

/// A borrowed view of one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge<'a> {
    /// Source node.
    pub source: &'a Node,
    /// Target node.
    pub target: &'a Node,
    /// Scoring category.
    pub kind: EdgeKind,
}

/// Number of edges per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKindCounts {
    /// `regular` edges.
    pub regular: usize,
    /// `negated` edges.
    pub negated: usize,
    /// `choice` edges.
    pub choice: usize,
    /// `and` edges.
    pub and: usize,
}

impl EdgeKindCounts {
    /// Returns the count for one kind.
    #[must_use]
    pub fn get(&self, kind: EdgeKind) -> usize {
        match kind {
            EdgeKind::Regular => self.regular,
            EdgeKind::Negated => self.negated,
            EdgeKind::Choice => self.choice,
            EdgeKind::And => self.and,
        }
    }

    fn increment(&mut self, kind: EdgeKind) {
        match kind {
            EdgeKind::Regular => self.regular += 1,
            EdgeKind::Negated => self.negated += 1,
            EdgeKind::Choice => self.choice += 1,
            EdgeKind::And => self.and += 1,
        }
    }
}

impl ProgramGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds a node, or returns the existing node with the same key.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let key = node.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        idx
    }

    fn edge_attrs_mut(&mut self, source: NodeIndex, target: NodeIndex) -> &mut EdgeAttrs {
        let edge = match self.graph.find_edge(source, target) {
            Some(edge) => edge,
            None => self.graph.add_edge(source, target, EdgeAttrs::default()),
        };
        &mut self.graph[edge]
    }

    /// Records a body-to-head dependency. Overwrites the negation flag of an
    /// existing edge and keeps its structural tag.
    pub fn add_dependency(&mut self, source: NodeIndex, target: NodeIndex, negated: bool) {
        self.edge_attrs_mut(source, target).negated = negated;
    }

    /// Records a structural connection. Overwrites the tag of an existing
    /// edge and keeps its negation flag.
    pub fn add_connection(&mut self, source: NodeIndex, target: NodeIndex, connection: Connection) {
        self.edge_attrs_mut(source, target).connection = Some(connection);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Looks up a node by key.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&idx| &self.graph[idx])
    }

    /// Returns true if a node with this key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the category of the edge `source -> target`, if present.
    #[must_use]
    pub fn edge_kind(&self, source: &str, target: &str) -> Option<EdgeKind> {
        let source = *self.index.get(source)?;
        let target = *self.index.get(target)?;
        let edge = self.graph.find_edge(source, target)?;
        Some(self.graph[edge].kind())
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge<'_>> {
        self.graph.edge_references().map(|edge| GraphEdge {
            source: &self.graph[edge.source()],
            target: &self.graph[edge.target()],
            kind: edge.weight().kind(),
        })
    }

    /// Counts edges per category.
    #[must_use]
    pub fn edge_kind_counts(&self) -> EdgeKindCounts {
        let mut counts = EdgeKindCounts::default();
        for edge in self.edges() {
            counts.increment(edge.kind);
        }
        counts
    }

    /// Total degree (in + out) of a node. A self-loop counts twice.
    #[must_use]
    pub fn degree(&self, key: &str) -> Option<usize> {
        let idx = *self.index.get(key)?;
        Some(self.degree_of(idx))
    }

    fn degree_of(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Iterates over nodes with no incident edges.
    pub fn isolated_nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph
            .node_indices()
            .filter(|&idx| self.degree_of(idx) == 0)
            .map(|idx| &self.graph[idx])
    }

    /// Returns a serializable snapshot of the graph.
    #[must_use]
    pub fn export(&self) -> export::GraphExport {
        export::GraphExport::from_graph(self)
    }
}

/// Serializable snapshots of a [`ProgramGraph`].
pub mod export {
    use super::{EdgeKindCounts, ProgramGraph};
    use crate::node::{EdgeKind, Node};

    /// One exported node.
    #[derive(Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct NodeExport {
        /// Node key.
        pub id: String,
        /// Lower bound for choice nodes.
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        pub lower_bound: Option<u32>,
        /// Upper bound for choice nodes.
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        pub upper_bound: Option<u32>,
    }

    /// One exported edge.
    #[derive(Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct EdgeExport {
        /// Source node key.
        pub source: String,
        /// Target node key.
        pub target: String,
        /// Scoring category.
        pub kind: EdgeKind,
    }

    /// Node list, edge list, and per-category counts.
    #[derive(Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct GraphExport {
        /// Nodes in insertion order.
        pub nodes: Vec<NodeExport>,
        /// Edges in insertion order.
        pub edges: Vec<EdgeExport>,
        /// Edge counts per category.
        pub counts: EdgeKindCounts,
    }

    impl GraphExport {
        pub(super) fn from_graph(graph: &ProgramGraph) -> Self {
            let nodes = graph
                .nodes()
                .map(|node| {
                    let (lower_bound, upper_bound) = match node {
                        Node::Choice {
                            lower_bound,
                            upper_bound,
                        } => (Some(*lower_bound), Some(*upper_bound)),
                        Node::Predicate(_) => (None, None),
                    };
                    NodeExport {
                        id: node.key(),
                        lower_bound,
                        upper_bound,
                    }
                })
                .collect();
            let edges = graph
                .edges()
                .map(|edge| EdgeExport {
                    source: edge.source.key(),
                    target: edge.target.key(),
                    kind: edge.kind,
                })
                .collect();
            Self {
                nodes,
                edges,
                counts: graph.edge_kind_counts(),
            }
        }
    }
}
