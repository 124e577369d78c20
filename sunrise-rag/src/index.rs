//! Approximate nearest-neighbour index over the corpus embeddings.
//!
//! [`VectorIndexStrategy`] inserts every document vector into an HNSW graph
//! once when it is built. A query walks the graph to collect candidate
//! neighbours instead of scanning the whole corpus, and the candidates are
//! then scored with [`cosine_similarity`] against the stored embeddings so
//! their scores and tie order match the brute-force strategy.
//!
//! This module is only available when the `hnsw` feature is enabled.

use std::sync::Arc;

use async_trait::async_trait;
use hnsw_rs::prelude::*;
use tracing::{debug, info};

use crate::cosine::{cosine_similarity, embed_query};
use crate::document::{Corpus, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::strategy::{RetrievalStrategy, top_k_descending};

/// Graph construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct HnswParams {
    /// Maximum number of links per node and layer.
    pub max_connections: usize,
    /// Candidate list size while inserting.
    pub ef_construction: usize,
    /// Candidate list size while searching; raised to `top_k` when smaller.
    pub ef_search: usize,
    /// Maximum number of layers.
    pub max_layers: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self { max_connections: 16, ef_construction: 200, ef_search: 64, max_layers: 16 }
    }
}

/// Semantic retrieval backed by an HNSW index built at construction time.
pub struct VectorIndexStrategy {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingProvider>,
    hnsw: Hnsw<'static, f32, DistCosine>,
    /// Documents whose embedding has zero magnitude. They cannot be placed
    /// in a cosine graph and always score 0.
    zero_rows: Vec<usize>,
    params: HnswParams,
    dimensions: usize,
}

/// Unit-length copy of `v`, normalised in `f64`. `None` for zero or
/// non-finite magnitudes.
fn unit_vector(v: &[f32]) -> Option<Vec<f32>> {
    let norm = v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(v.iter().map(|x| (f64::from(*x) / norm) as f32).collect())
}

impl VectorIndexStrategy {
    /// Build the index from the corpus embeddings with default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the corpus has no embeddings.
    pub fn build(corpus: Arc<Corpus>, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Self::with_params(corpus, embedder, HnswParams::default())
    }

    /// Build the index with explicit graph parameters.
    pub fn with_params(
        corpus: Arc<Corpus>,
        embedder: Arc<dyn EmbeddingProvider>,
        params: HnswParams,
    ) -> Result<Self> {
        let embeddings = corpus.embeddings().ok_or_else(|| {
            RagError::ConfigError("vector index retrieval requires corpus embeddings".to_string())
        })?;
        let dimensions = corpus.dimensions().unwrap_or(0);

        let mut hnsw = Hnsw::<f32, DistCosine>::new(
            params.max_connections,
            embeddings.len().max(1),
            params.max_layers,
            params.ef_construction,
            DistCosine,
        );

        let mut zero_rows = Vec::new();
        for (index, embedding) in embeddings.iter().enumerate() {
            match unit_vector(embedding) {
                Some(unit) => hnsw.insert((unit.as_slice(), index)),
                None => zero_rows.push(index),
            }
        }
        hnsw.set_searching_mode(true);

        info!(
            rows = embeddings.len(),
            zero_rows = zero_rows.len(),
            dimensions,
            "vector index built"
        );
        Ok(Self { corpus, embedder, hnsw, zero_rows, params, dimensions })
    }

    /// Number of indexed documents, including zero-magnitude ones.
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Collect graph neighbours for `query` and score them exactly.
    fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredResult> {
        let embeddings = self.corpus.embeddings().unwrap_or_default();

        // A zero query has cosine 0 with every document, so all of them tie.
        let Some(unit) = unit_vector(query) else {
            let scored = (0..embeddings.len()).map(|index| ScoredResult { index, score: 0.0 });
            return top_k_descending(scored.collect(), top_k);
        };

        let ef = self.params.ef_search.max(top_k);
        let mut candidates: Vec<usize> =
            self.hnsw.search(&unit, top_k, ef).into_iter().map(|n| n.d_id).collect();
        candidates.extend_from_slice(&self.zero_rows);
        // Corpus order, so the stable sort breaks ties by index.
        candidates.sort_unstable();
        candidates.dedup();

        let scored = candidates
            .into_iter()
            .filter_map(|index| {
                let embedding = embeddings.get(index)?;
                Some(ScoredResult { index, score: cosine_similarity(embedding, query) })
            })
            .collect();
        top_k_descending(scored, top_k)
    }
}

#[async_trait]
impl RetrievalStrategy for VectorIndexStrategy {
    async fn rank(&self, query: &str, top_k: usize) -> Result<Vec<ScoredResult>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = embed_query(self.embedder.as_ref(), query, self.dimensions).await?;
        debug!(strategy = self.name(), rows = self.len(), "searching index");

        Ok(self.search(&query_embedding, top_k))
    }

    fn name(&self) -> &'static str {
        "vector-index"
    }
}
