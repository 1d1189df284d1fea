//! Edge feature vectors.
//!
//! An edge `u -> v` is represented by the concatenation of its endpoints'
//! description embeddings, so two edges are close when both their sources and
//! their targets read alike.

use guidelog_foundation::Result;
use guidelog_graph::{EdgeKind, Node, ProgramGraph};

use crate::embedding::Embedder;

/// Returns the natural-language description a node is embedded from.
#[must_use]
pub fn node_description(node: &Node) -> String {
    match node {
        Node::Predicate(atom) if atom.args.is_empty() => {
            format!("Predicate {} with no arguments", atom.name)
        }
        Node::Predicate(atom) => {
            format!(
                "Predicate {} with arguments {}",
                atom.name,
                atom.args.join(", ")
            )
        }
        Node::Choice {
            lower_bound,
            upper_bound,
        } => format!("Choice rule with bounds {lower_bound}-{upper_bound}"),
    }
}

/// Edge feature vectors of one graph, grouped by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeFeatures {
    regular: Vec<Vec<f64>>,
    negated: Vec<Vec<f64>>,
    choice: Vec<Vec<f64>>,
    and: Vec<Vec<f64>>,
}

impl EdgeFeatures {
    /// Embeds every edge of `graph`.
    ///
    /// Isolated nodes contribute a self-feature `e(n) ++ e(n)` to the
    /// `regular` category so that fact-only programs still carry signal.
    ///
    /// # Errors
    ///
    /// Propagates embedding failures.
    pub fn from_graph<E: Embedder>(graph: &ProgramGraph, embedder: &E) -> Result<Self> {
        let mut features = Self::default();
        for edge in graph.edges() {
            let feature = concat(
                &embedder.embed(&node_description(edge.source))?,
                &embedder.embed(&node_description(edge.target))?,
            );
            features.category_mut(edge.kind).push(feature);
        }
        for node in graph.isolated_nodes() {
            let embedding = embedder.embed(&node_description(node))?;
            features.regular.push(concat(&embedding, &embedding));
        }
        Ok(features)
    }

    /// Feature vectors of one category.
    #[must_use]
    pub fn category(&self, kind: EdgeKind) -> &[Vec<f64>] {
        match kind {
            EdgeKind::Regular => &self.regular,
            EdgeKind::Negated => &self.negated,
            EdgeKind::Choice => &self.choice,
            EdgeKind::And => &self.and,
        }
    }

    fn category_mut(&mut self, kind: EdgeKind) -> &mut Vec<Vec<f64>> {
        match kind {
            EdgeKind::Regular => &mut self.regular,
            EdgeKind::Negated => &mut self.negated,
            EdgeKind::Choice => &mut self.choice,
            EdgeKind::And => &mut self.and,
        }
    }

    /// Total number of feature vectors across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        EdgeKind::ALL.iter().map(|&k| self.category(k).len()).sum()
    }

    /// Returns true when no category has features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn concat(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}
