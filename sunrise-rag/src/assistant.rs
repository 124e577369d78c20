//! Question-answering orchestrator.
//!
//! The [`HospitalAssistant`] runs one request as retrieve → compose, in that
//! order, against a shared read-only [`Corpus`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sunrise_rag::{Corpus, HospitalAssistant, RagConfig};
//!
//! let assistant = HospitalAssistant::builder()
//!     .config(RagConfig::default())
//!     .corpus(Arc::new(Corpus::load("hospital_docs.json", None)?))
//!     .embedding_provider(Arc::new(my_embedder)) // optional
//!     .generation_provider(Arc::new(my_generator))
//!     .build()?;
//!
//! let answer = assistant.answer_query("When are visiting hours?").await;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::composer::AnswerComposer;
use crate::config::RagConfig;
use crate::document::Corpus;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::retriever::{RetrievalMode, Retriever};

/// The hospital question-answering service.
///
/// Construct one via [`HospitalAssistant::builder()`].
pub struct HospitalAssistant {
    config: RagConfig,
    retriever: Retriever,
    composer: AnswerComposer,
}

impl HospitalAssistant {
    /// Create a new [`HospitalAssistantBuilder`].
    pub fn builder() -> HospitalAssistantBuilder {
        HospitalAssistantBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the retriever.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Return a reference to the composer.
    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }

    /// The retrieval mode selected at startup.
    pub fn mode(&self) -> RetrievalMode {
        self.retriever.mode()
    }

    /// Answer a question: retrieve context, then compose a grounded answer.
    ///
    /// `question` is expected to be non-empty and trimmed; rejecting blank
    /// input is the caller's job. This method never fails: provider
    /// problems degrade to a fixed natural-language message.
    pub async fn answer_query(&self, question: &str) -> String {
        let chunks = self.retriever.search(question).await;
        let answer = self.composer.compose(question, &chunks).await;
        info!(chunk_count = chunks.len(), answer_len = answer.len(), "query answered");
        answer
    }
}

/// Builder for constructing a [`HospitalAssistant`].
///
/// `config`, `corpus` and `generation_provider` are required. Without an
/// `embedding_provider` the assistant runs in keyword mode.
#[derive(Default)]
pub struct HospitalAssistantBuilder {
    config: Option<RagConfig>,
    corpus: Option<Arc<Corpus>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
}

impl HospitalAssistantBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the shared corpus.
    pub fn corpus(mut self, corpus: Arc<Corpus>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Set the embedding provider used for semantic retrieval.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the generation provider.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Build the [`HospitalAssistant`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or
    /// the configuration is invalid.
    pub fn build(self) -> Result<HospitalAssistant> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let corpus =
            self.corpus.ok_or_else(|| RagError::ConfigError("corpus is required".to_string()))?;
        let generation_provider = self.generation_provider.ok_or_else(|| {
            RagError::ConfigError("generation_provider is required".to_string())
        })?;

        let retriever = Retriever::new(corpus, self.embedding_provider, &config)?;
        let composer = AnswerComposer::new(generation_provider, config.hospital_name.clone());

        Ok(HospitalAssistant { config, retriever, composer })
    }
}
