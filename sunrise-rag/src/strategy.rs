//! Ranking strategy trait shared by the semantic and keyword retrievers.

use async_trait::async_trait;

use crate::document::ScoredResult;
use crate::error::Result;

/// A way of ranking corpus documents by relevance to a query.
///
/// Implementations return at most `top_k` results with distinct corpus
/// indices, ordered by descending score. Equal scores keep corpus order.
///
/// # Example
///
/// ```rust,ignore
/// use sunrise_rag::{KeywordStrategy, RetrievalStrategy};
///
/// let strategy = KeywordStrategy::new(corpus.clone());
/// let results = strategy.rank("visiting hours", 10).await?;
/// ```
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    /// Rank documents for `query`, returning the `top_k` best.
    async fn rank(&self, query: &str, top_k: usize) -> Result<Vec<ScoredResult>>;

    /// Short name of the strategy, used in logs.
    fn name(&self) -> &'static str;
}

/// Sort by descending score and keep the first `top_k`.
///
/// The sort is stable, so results that were produced in corpus order keep
/// that order among equal scores. `-0.0` and `+0.0` count as equal.
pub(crate) fn top_k_descending(mut scored: Vec<ScoredResult>, top_k: usize) -> Vec<ScoredResult> {
    scored.sort_by(|a, b| (b.score + 0.0).total_cmp(&(a.score + 0.0)));
    scored.truncate(top_k);
    scored
}
