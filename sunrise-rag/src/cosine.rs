//! Brute-force cosine similarity over the corpus embeddings.
//!
//! [`BruteForceCosineStrategy`] embeds the query and scores it against every
//! stored document vector on each request. There is no index to build, which
//! suits corpora of a few thousand chunks or fewer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::document::{Corpus, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::strategy::{RetrievalStrategy, top_k_descending};

/// Compute cosine similarity between two vectors.
///
/// Sums are accumulated in `f64` so large but finite components do not
/// overflow. Returns `+0.0` if either vector has zero magnitude, the lengths
/// differ, or the result is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (dot, norm_a, norm_b) =
        a.iter().zip(b.iter()).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (x, y)| {
            let (x, y) = (f64::from(*x), f64::from(*y));
            (dot + x * y, na + x * x, nb + y * y)
        });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    finite_score(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Narrow a similarity to `f32`, mapping non-finite values and `-0.0` to `+0.0`.
fn finite_score(score: f64) -> f32 {
    let score = score as f32;
    if score.is_finite() { score + 0.0 } else { 0.0 }
}

/// Embed `query`, rejecting vectors whose length does not match the corpus.
pub(crate) async fn embed_query(
    embedder: &dyn EmbeddingProvider,
    query: &str,
    dimensions: usize,
) -> Result<Vec<f32>> {
    let embedding = embedder.embed(query).await?;
    if embedding.len() != dimensions {
        return Err(RagError::EmbeddingError {
            provider: embedder.name().to_string(),
            message: format!(
                "provider returned {} dimensions, corpus has {dimensions}",
                embedding.len()
            ),
        });
    }
    Ok(embedding)
}

/// Semantic retrieval that compares the query with every document vector.
pub struct BruteForceCosineStrategy {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl BruteForceCosineStrategy {
    /// Create the strategy over a corpus that carries embeddings.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the corpus has no embeddings.
    pub fn new(corpus: Arc<Corpus>, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        if !corpus.has_embeddings() {
            return Err(RagError::ConfigError(
                "brute-force cosine retrieval requires corpus embeddings".to_string(),
            ));
        }
        Ok(Self { corpus, embedder })
    }
}

#[async_trait]
impl RetrievalStrategy for BruteForceCosineStrategy {
    async fn rank(&self, query: &str, top_k: usize) -> Result<Vec<ScoredResult>> {
        let embeddings = self.corpus.embeddings().unwrap_or_default();
        let Some(dimensions) = self.corpus.dimensions() else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = embed_query(self.embedder.as_ref(), query, dimensions).await?;
        debug!(strategy = self.name(), dimensions = query_embedding.len(), "scoring corpus");

        let scored = embeddings
            .iter()
            .enumerate()
            .map(|(index, embedding)| ScoredResult {
                index,
                score: cosine_similarity(embedding, &query_embedding),
            })
            .collect();

        Ok(top_k_descending(scored, top_k))
    }

    fn name(&self) -> &'static str {
        "brute-force-cosine"
    }
}
