//! The retriever: one entry point over the semantic and keyword strategies.
//!
//! The [`Retriever`] decides its [`RetrievalMode`] once, when it is built.
//! Semantic mode needs both corpus embeddings and an embedding provider;
//! otherwise the retriever is keyword-only for the life of the process. In
//! semantic mode a failed query embedding does not fail the request: the
//! same query is re-ranked with the keyword strategy instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use sunrise_rag::{Corpus, RagConfig, Retriever};
//!
//! let embeddings = Path::new("hospital_embeddings.json");
//! let corpus = Arc::new(Corpus::load("hospital_docs.json", Some(embeddings))?);
//! let retriever = Retriever::new(corpus, Some(embedder), &RagConfig::default())?;
//! let chunks = retriever.search("when can I visit").await;
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{RagConfig, VectorBackend};
use crate::cosine::BruteForceCosineStrategy;
use crate::document::{Corpus, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::keyword::KeywordStrategy;
use crate::strategy::RetrievalStrategy;

/// The retrieval mode selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Vector similarity with keyword fallback on provider failure.
    Semantic(VectorBackend),
    /// Keyword and phrase scoring only.
    Keyword,
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMode::Semantic(backend) => write!(f, "semantic ({backend})"),
            RetrievalMode::Keyword => f.write_str("keyword"),
        }
    }
}

#[cfg(feature = "hnsw")]
fn vector_index(
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<Arc<dyn RetrievalStrategy>> {
    Ok(Arc::new(crate::index::VectorIndexStrategy::build(corpus, embedder)?))
}

#[cfg(not(feature = "hnsw"))]
fn vector_index(
    _corpus: Arc<Corpus>,
    _embedder: Arc<dyn EmbeddingProvider>,
) -> Result<Arc<dyn RetrievalStrategy>> {
    Err(crate::error::RagError::ConfigError(
        "the index vector backend requires the `hnsw` feature".to_string(),
    ))
}

/// Maps a query to the most relevant corpus texts.
///
/// Holds no per-request state; a single instance can serve concurrent
/// requests behind an `Arc`.
pub struct Retriever {
    corpus: Arc<Corpus>,
    semantic: Option<Arc<dyn RetrievalStrategy>>,
    keyword: KeywordStrategy,
    mode: RetrievalMode,
    semantic_top_k: usize,
    keyword_top_k: usize,
}

impl Retriever {
    /// Build a retriever and select its mode.
    ///
    /// Semantic mode is chosen when the corpus carries embeddings and an
    /// embedder is supplied; `config.vector_backend` picks the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`](crate::RagError::ConfigError) if the
    /// configuration is invalid, or if it selects the index backend without
    /// the `hnsw` feature.
    pub fn new(
        corpus: Arc<Corpus>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        config: &RagConfig,
    ) -> Result<Self> {
        config.validate()?;

        let semantic: Option<Arc<dyn RetrievalStrategy>> = match embedder {
            Some(embedder) if corpus.has_embeddings() => Some(match config.vector_backend {
                VectorBackend::BruteForce => {
                    Arc::new(BruteForceCosineStrategy::new(corpus.clone(), embedder)?)
                        as Arc<dyn RetrievalStrategy>
                }
                VectorBackend::Index => vector_index(corpus.clone(), embedder)?,
            }),
            Some(_) => {
                info!("corpus has no embeddings, ignoring embedding provider");
                None
            }
            None => None,
        };

        let mode = if semantic.is_some() {
            RetrievalMode::Semantic(config.vector_backend)
        } else {
            RetrievalMode::Keyword
        };

        let retriever = Self {
            keyword: KeywordStrategy::new(corpus.clone()),
            mode,
            corpus,
            semantic,
            semantic_top_k: config.semantic_top_k,
            keyword_top_k: config.keyword_top_k,
        };
        info!(mode = %retriever.mode(), documents = retriever.corpus.len(), "retriever ready");
        Ok(retriever)
    }

    /// Create a keyword-only retriever.
    pub fn keyword_only(corpus: Arc<Corpus>, config: &RagConfig) -> Result<Self> {
        Self::new(corpus, None, config)
    }

    /// The mode selected at construction.
    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    /// The shared corpus.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Return up to the mode's default k texts, most relevant first.
    pub async fn search(&self, query: &str) -> Vec<String> {
        let results = self.search_scored(query).await;
        self.corpus.texts(&results)
    }

    /// Like [`search`](Self::search) but returns corpus indices and scores.
    pub async fn search_scored(&self, query: &str) -> Vec<ScoredResult> {
        self.rank(query, None).await
    }

    /// Return up to `top_k` texts, overriding the configured k.
    pub async fn search_with_k(&self, query: &str, top_k: usize) -> Vec<String> {
        let results = self.rank(query, Some(top_k)).await;
        self.corpus.texts(&results)
    }

    async fn rank(&self, query: &str, top_k: Option<usize>) -> Vec<ScoredResult> {
        if self.corpus.is_empty() {
            return Vec::new();
        }

        if let Some(semantic) = &self.semantic {
            let k = top_k.unwrap_or(self.semantic_top_k);
            match semantic.rank(query, k).await {
                Ok(results) => {
                    debug!(strategy = semantic.name(), result_count = results.len(), "retrieved");
                    return results;
                }
                Err(e) => {
                    warn!(
                        strategy = semantic.name(),
                        error = %e,
                        "semantic retrieval failed, falling back to keyword"
                    );
                }
            }
        }

        let results = self.keyword.rank_sync(query, top_k.unwrap_or(self.keyword_top_k));
        debug!(strategy = "keyword", result_count = results.len(), "retrieved");
        results
    }
}
