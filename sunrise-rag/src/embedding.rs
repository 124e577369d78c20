//! Embedding provider trait for turning query text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend (Gemini, a local
/// model, a test double) behind a unified async interface. The vectors must
/// come from the same model that produced the corpus embeddings.
///
/// # Example
///
/// ```rust,ignore
/// use sunrise_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("visiting hours").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Short name of the backend, used in logs and errors.
    fn name(&self) -> &str;
}
