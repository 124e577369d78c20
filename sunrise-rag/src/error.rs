//! Error types for the `sunrise-rag` crate.

use thiserror::Error;

/// Errors that can occur while loading the corpus, retrieving, or generating.
///
/// Provider errors are recovered inside
/// [`HospitalAssistant::answer_query`](crate::HospitalAssistant::answer_query) and
/// never reach the caller of that method. Corpus and configuration
/// errors surface at startup.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while generating an answer.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The document corpus could not be loaded or violates its invariants.
    #[error("Corpus error: {0}")]
    CorpusError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
