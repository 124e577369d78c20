//! Keyword and phrase scoring over raw document text.
//!
//! This is the only strategy when no embeddings are loaded, and the
//! per-request fallback when the embedding provider fails.
//!
//! Matching is case-insensitive substring counting: the token `visit` counts
//! once inside `Visiting`. A document that contains the whole query as a
//! phrase earns a flat [`PHRASE_BONUS`] on top of its token counts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::document::{Corpus, ScoredResult};
use crate::error::Result;
use crate::strategy::{RetrievalStrategy, top_k_descending};

/// Score added when the full lower-cased query occurs in a document.
pub const PHRASE_BONUS: u32 = 100;

/// Score one document against a query.
///
/// The score is the sum, over whitespace-separated lower-cased query tokens,
/// of the non-overlapping occurrences of each token in the lower-cased
/// document, plus [`PHRASE_BONUS`] if the whole trimmed query occurs in it.
pub fn keyword_score(query: &str, document: &str) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }
    let document = document.to_lowercase();

    let token_hits: usize =
        query.split_whitespace().map(|token| document.matches(token).count()).sum();
    let phrase_bonus = if document.contains(query.as_str()) { PHRASE_BONUS } else { 0 };

    u32::try_from(token_hits).unwrap_or(u32::MAX).saturating_add(phrase_bonus)
}

/// Retrieval by keyword occurrence counts and exact-phrase bonus.
#[derive(Debug, Clone)]
pub struct KeywordStrategy {
    corpus: Arc<Corpus>,
}

impl KeywordStrategy {
    /// Create the strategy over a corpus.
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    /// Rank synchronously; keyword scoring never touches a provider.
    pub fn rank_sync(&self, query: &str, top_k: usize) -> Vec<ScoredResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let scored: Vec<ScoredResult> = self
            .corpus
            .documents()
            .iter()
            .enumerate()
            .filter_map(|(index, document)| {
                let score = keyword_score(query, &document.text);
                (score > 0).then_some(ScoredResult { index, score: score as f32 })
            })
            .collect();

        debug!(strategy = "keyword", matches = scored.len(), "scored corpus");
        top_k_descending(scored, top_k)
    }
}

#[async_trait]
impl RetrievalStrategy for KeywordStrategy {
    async fn rank(&self, query: &str, top_k: usize) -> Result<Vec<ScoredResult>> {
        Ok(self.rank_sync(query, top_k))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
