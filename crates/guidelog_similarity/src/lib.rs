//! Structural and semantic similarity between ASP program graphs.
//!
//! This crate provides:
//! - [`Embedder`] - Text embedding seam, with a deterministic built-in
//!   ([`HashedNgramEmbedder`]) and a memoizing wrapper ([`CachedEmbedder`])
//! - [`EdgeFeatures`] - Per-category edge feature vectors for one graph
//! - [`TransportStrategy`] - Optimal transport ([`EarthMovers`]) and
//!   assignment ([`Assignment`]) distances over a [`CostMatrix`]
//! - [`GraphSimilarityScorer`] - The adjusted similarity metric
//!
//! # Scoring
//!
//! ```text
//! ground truth graph ─┐                          ┌─ regular ─┐
//!                     ├─ embed nodes ─ features ─┼─ negated ─┼─ mean ─ × (1 − penalty)
//! generated graph ────┘                          ├─ choice ──┤
//!                                                └─ and ─────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod embedding;
pub mod features;
pub mod scorer;
pub mod transport;

pub use embedding::{CachedEmbedder, Embedder, FnEmbedder, HashedNgramEmbedder, cosine_similarity};
pub use features::{EdgeFeatures, node_description};
pub use scorer::{
    CategoryScore, GraphSimilarityScorer, ScoreMethod, ScorerConfig, SimilarityScore,
    structure_penalty,
};
pub use transport::{Assignment, CostMatrix, EarthMovers, TransportError, TransportStrategy};
