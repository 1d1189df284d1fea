//! The adjusted graph similarity metric.
//!
//! For each edge category the two graphs' edge features are matched by
//! optimal transport over cosine costs. Category similarities are averaged and
//! then discounted by how much the graphs differ in size.

use std::fmt;

use guidelog_foundation::Result;
use guidelog_graph::{EdgeKind, ProgramGraph};

use crate::embedding::{CachedEmbedder, Embedder, cosine_similarity};
use crate::features::EdgeFeatures;
use crate::transport::{Assignment, CostMatrix, EarthMovers, TransportStrategy};

// =============================================================================
// Configuration
// =============================================================================

/// Scorer settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScorerConfig {
    /// Weight of the size-mismatch penalty. 0 disables it.
    pub structure_penalty_factor: f64,
}

impl ScorerConfig {
    /// Default penalty weight.
    pub const DEFAULT_PENALTY_FACTOR: f64 = 0.5;

    /// Sets the penalty weight.
    #[must_use]
    pub fn with_structure_penalty_factor(mut self, factor: f64) -> Self {
        self.structure_penalty_factor = factor;
        self
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            structure_penalty_factor: Self::DEFAULT_PENALTY_FACTOR,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// How one category's similarity was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreMethod {
    /// Both graphs have no edges of this kind.
    Vacuous,
    /// Exactly one graph has edges of this kind.
    Disjoint,
    /// The primary transport strategy succeeded.
    Transport(String),
    /// The primary strategy failed and the fallback was used.
    Fallback(String),
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacuous => f.write_str("vacuous"),
            Self::Disjoint => f.write_str("disjoint"),
            Self::Transport(name) => f.write_str(name),
            Self::Fallback(name) => write!(f, "fallback:{name}"),
        }
    }
}

/// Similarity of one edge category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryScore {
    /// Edge category.
    pub kind: EdgeKind,
    /// Feature vectors on the ground-truth side.
    pub ground_truth_edges: usize,
    /// Feature vectors on the generated side.
    pub generated_edges: usize,
    /// Similarity in `[0, 1]`.
    pub similarity: f64,
    /// How the similarity was obtained.
    pub method: ScoreMethod,
}

/// Result of comparing two graphs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityScore {
    /// `raw × (1 − structure_penalty)`.
    pub adjusted: f64,
    /// Mean of the category similarities.
    pub raw: f64,
    /// Size-mismatch penalty in `[0, factor]`.
    pub structure_penalty: f64,
    /// Per-category breakdown in [`EdgeKind::ALL`] order.
    pub categories: Vec<CategoryScore>,
}

impl SimilarityScore {
    /// Returns the breakdown for one category.
    #[must_use]
    pub fn category(&self, kind: EdgeKind) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.kind == kind)
    }
}

// =============================================================================
// Structure Penalty
// =============================================================================

/// Size-mismatch penalty between two graphs.
///
/// `factor × mean(|Δnodes| / max nodes, |Δedges| / max edges)`, where a term
/// whose maximum is zero contributes zero.
#[must_use]
pub fn structure_penalty(ground_truth: &ProgramGraph, generated: &ProgramGraph, factor: f64) -> f64 {
    let nodes = relative_difference(ground_truth.node_count(), generated.node_count());
    let edges = relative_difference(ground_truth.edge_count(), generated.edge_count());
    factor * (nodes + edges) / 2.0
}

#[allow(clippy::cast_precision_loss)]
fn relative_difference(a: usize, b: usize) -> f64 {
    let max = a.max(b);
    if max == 0 {
        return 0.0;
    }
    a.abs_diff(b) as f64 / max as f64
}

// =============================================================================
// Scorer
// =============================================================================

/// Compares program graphs.
pub struct GraphSimilarityScorer<E> {
    embedder: CachedEmbedder<E>,
    config: ScorerConfig,
    primary: Box<dyn TransportStrategy>,
    fallback: Box<dyn TransportStrategy>,
}

impl<E: Embedder> GraphSimilarityScorer<E> {
    /// Creates a scorer with the default configuration, exact optimal
    /// transport as the primary strategy, and assignment as the fallback.
    #[must_use]
    pub fn new(embedder: E) -> Self {
        Self {
            embedder: CachedEmbedder::new(embedder),
            config: ScorerConfig::default(),
            primary: Box::new(EarthMovers::new()),
            fallback: Box::new(Assignment),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScorerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the primary transport strategy.
    #[must_use]
    pub fn with_primary(mut self, strategy: impl TransportStrategy + 'static) -> Self {
        self.primary = Box::new(strategy);
        self
    }

    /// Replaces the fallback transport strategy.
    #[must_use]
    pub fn with_fallback(mut self, strategy: impl TransportStrategy + 'static) -> Self {
        self.fallback = Box::new(strategy);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Scores `generated` against `ground_truth`.
    ///
    /// # Errors
    ///
    /// Returns an embedding error if a node description cannot be embedded,
    /// or a transport error if both strategies fail for some category.
    pub fn score(
        &self,
        ground_truth: &ProgramGraph,
        generated: &ProgramGraph,
    ) -> Result<SimilarityScore> {
        let gt_features = EdgeFeatures::from_graph(ground_truth, &self.embedder)?;
        let gen_features = EdgeFeatures::from_graph(generated, &self.embedder)?;

        let mut categories = Vec::with_capacity(EdgeKind::ALL.len());
        for kind in EdgeKind::ALL {
            let score = self.score_category(
                kind,
                gt_features.category(kind),
                gen_features.category(kind),
            )?;
            tracing::debug!(
                category = %kind,
                ground_truth_edges = score.ground_truth_edges,
                generated_edges = score.generated_edges,
                similarity = score.similarity,
                method = %score.method,
                "scored edge category"
            );
            categories.push(score);
        }

        #[allow(clippy::cast_precision_loss)]
        let raw = categories.iter().map(|c| c.similarity).sum::<f64>() / categories.len() as f64;
        let penalty =
            structure_penalty(ground_truth, generated, self.config.structure_penalty_factor);
        let adjusted = (raw * (1.0 - penalty)).clamp(0.0, 1.0);

        Ok(SimilarityScore {
            adjusted,
            raw,
            structure_penalty: penalty,
            categories,
        })
    }

    /// Scores many generated graphs against one ground truth.
    ///
    /// A failed comparison is logged and yields `None`; the rest still run.
    pub fn compare_all<'a>(
        &self,
        ground_truth: &ProgramGraph,
        generated: impl IntoIterator<Item = &'a ProgramGraph>,
    ) -> Vec<Option<SimilarityScore>> {
        generated
            .into_iter()
            .enumerate()
            .map(|(i, graph)| match self.score(ground_truth, graph) {
                Ok(score) => Some(score),
                Err(err) => {
                    tracing::error!(index = i, error = %err, "graph comparison failed");
                    None
                }
            })
            .collect()
    }

    fn score_category(
        &self,
        kind: EdgeKind,
        ground_truth: &[Vec<f64>],
        generated: &[Vec<f64>],
    ) -> Result<CategoryScore> {
        let (similarity, method) = match (ground_truth.is_empty(), generated.is_empty()) {
            (true, true) => (1.0, ScoreMethod::Vacuous),
            (true, false) | (false, true) => (0.0, ScoreMethod::Disjoint),
            (false, false) => {
                let costs = CostMatrix::from_fn(ground_truth.len(), generated.len(), |r, c| {
                    1.0 - cosine_similarity(&ground_truth[r], &generated[c])
                });
                match self.primary.distance(&costs) {
                    Ok(distance) => (
                        1.0 - distance,
                        ScoreMethod::Transport(self.primary.name().to_string()),
                    ),
                    Err(err) => {
                        tracing::warn!(
                            category = %kind,
                            strategy = self.primary.name(),
                            fallback = self.fallback.name(),
                            error = %err,
                            "transport failed, falling back"
                        );
                        let distance = self.fallback.distance(&costs)?;
                        (
                            1.0 - distance,
                            ScoreMethod::Fallback(self.fallback.name().to_string()),
                        )
                    }
                }
            }
        };

        Ok(CategoryScore {
            kind,
            ground_truth_edges: ground_truth.len(),
            generated_edges: generated.len(),
            similarity: similarity.clamp(0.0, 1.0),
            method,
        })
    }
}
