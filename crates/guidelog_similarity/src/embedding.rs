//! Text embeddings for node descriptions.
//!
//! The scorer only needs "text in, fixed-length vector out". Any model can be
//! attached through [`Embedder`]; [`HashedNgramEmbedder`] is a deterministic
//! stand-in that needs no model files.

use std::cell::RefCell;
use std::collections::HashMap;

use guidelog_foundation::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// =============================================================================
// Embedder Trait
// =============================================================================

/// Maps text to a fixed-dimension vector.
pub trait Embedder {
    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// Embeds one text.
    ///
    /// # Errors
    ///
    /// Returns an embedding error if the text cannot be embedded.
    fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        (**self).embed(text)
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        (**self).embed(text)
    }
}

/// Adapts a closure into an [`Embedder`].
pub struct FnEmbedder<F> {
    dimension: usize,
    embed: F,
}

impl<F> FnEmbedder<F>
where
    F: Fn(&str) -> Result<Vec<f64>>,
{
    /// Wraps `embed`, which must return vectors of length `dimension`.
    #[must_use]
    pub fn new(dimension: usize, embed: F) -> Self {
        Self { dimension, embed }
    }
}

impl<F> Embedder for FnEmbedder<F>
where
    F: Fn(&str) -> Result<Vec<f64>>,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        (self.embed)(text)
    }
}

// =============================================================================
// Hashed N-gram Embedder
// =============================================================================

/// Deterministic random-indexing embedder.
///
/// Each lowercase word and each character trigram of a word is assigned a
/// pseudo-random vector seeded from its hash; a text's embedding is the
/// normalized sum of its features' vectors. Texts sharing words or word
/// fragments land close together.
#[derive(Clone, Debug)]
pub struct HashedNgramEmbedder {
    dimension: usize,
    seed: u64,
}

impl HashedNgramEmbedder {
    /// Default vector length.
    pub const DEFAULT_DIMENSION: usize = 384;

    /// Creates an embedder.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if `dimension` is zero.
    pub fn new(dimension: usize, seed: u64) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::invalid_argument("embedding dimension must be positive"));
        }
        Ok(Self { dimension, seed })
    }

    fn features(text: &str) -> Vec<String> {
        let mut features = Vec::new();
        for word in text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                features.push(format!("3:{}", gram.iter().collect::<String>()));
            }
            features.push(format!("w:{word}"));
        }
        if features.is_empty() {
            features.push(format!("t:{text}"));
        }
        features
    }
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
            seed: 0,
        }
    }
}

impl Embedder for HashedNgramEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let mut vector = vec![0.0; self.dimension];
        for feature in Self::features(text) {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ fnv1a(feature.as_bytes()));
            for x in &mut vector {
                *x += rng.gen_range(-1.0_f64..1.0);
            }
        }
        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }
}

/// 64-bit FNV-1a. Stable across platforms and compiler versions.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

// =============================================================================
// Cached Embedder
// =============================================================================

/// Memoizes embeddings per unique text and checks their length.
///
/// Embedding dominates scoring cost and node descriptions repeat across the
/// two compared graphs, so one cache should serve a whole comparison.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: RefCell<HashMap<String, Vec<f64>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    /// Wraps an embedder.
    #[must_use]
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct texts embedded so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Returns the wrapped embedder.
    #[must_use]
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        if let Some(vector) = self.cache.borrow().get(text) {
            return Ok(vector.clone());
        }
        let vector = self.inner.embed(text)?;
        if vector.len() != self.inner.dimension() {
            return Err(Error::embedding(format!(
                "expected {} dimensions for '{text}', got {}",
                self.inner.dimension(),
                vector.len()
            )));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(Error::embedding(format!(
                "non-finite component in embedding of '{text}'"
            )));
        }
        self.cache
            .borrow_mut()
            .insert(text.to_string(), vector.clone());
        Ok(vector)
    }
}

// =============================================================================
// Cosine Similarity
// =============================================================================

/// Cosine similarity clamped to `[-1, 1]`. Zero vectors score 0.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
