//! # sunrise-rag
//!
//! Retrieval-augmented question answering for the Sunrise Hospital assistant.
//!
//! ## Overview
//!
//! A request flows through two components:
//!
//! - [`Retriever`] - ranks a fixed, pre-chunked [`Corpus`] against the
//!   question, using vector similarity when embeddings are available and
//!   keyword/phrase scoring otherwise (or when the embedding call fails)
//! - [`AnswerComposer`] - builds a grounded prompt from the retrieved chunks,
//!   calls the [`GenerationProvider`], and turns every failure into a fixed
//!   user-facing sentence
//!
//! [`HospitalAssistant`] wires the two together behind
//! [`answer_query`](HospitalAssistant::answer_query).
//!
//! ## Strategies
//!
//! | Strategy | When |
//! |----------|------|
//! | [`BruteForceCosineStrategy`] | semantic mode, `VectorBackend::BruteForce` |
//! | `VectorIndexStrategy` | semantic mode, `VectorBackend::Index` (feature `hnsw`) |
//! | [`KeywordStrategy`] | no embeddings, or per-request fallback |
//!
//! ## Features
//!
//! - `gemini` - `GeminiEmbeddingProvider` and `GeminiGenerationProvider`
//!   over the Gemini REST API
//! - `hnsw` - `VectorIndexStrategy`, an HNSW index built with `hnsw_rs`

pub mod assistant;
pub mod composer;
pub mod config;
pub mod cosine;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
#[cfg(feature = "hnsw")]
pub mod index;
pub mod keyword;
pub mod retriever;
pub mod strategy;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use assistant::{HospitalAssistant, HospitalAssistantBuilder};
pub use composer::{APOLOGY_MESSAGE, AnswerComposer, NO_CONTEXT_MESSAGE, UNKNOWN_ANSWER};
pub use config::{RagConfig, RagConfigBuilder, VectorBackend};
pub use cosine::{BruteForceCosineStrategy, cosine_similarity};
pub use document::{Corpus, Document, ScoredResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::GenerationProvider;
#[cfg(feature = "hnsw")]
pub use index::{HnswParams, VectorIndexStrategy};
pub use keyword::{KeywordStrategy, PHRASE_BONUS, keyword_score};
pub use retriever::{RetrievalMode, Retriever};
pub use strategy::RetrievalStrategy;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiEmbeddingProvider, GeminiGenerationProvider};
