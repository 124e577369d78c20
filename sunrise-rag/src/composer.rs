//! Grounded prompt assembly and answer post-processing.

use std::sync::Arc;

use tracing::{debug, error};

use crate::generation::GenerationProvider;

/// The exact reply the model is told to give when the context lacks the answer.
pub const UNKNOWN_ANSWER: &str = "I don't know";

/// Returned without calling the model when retrieval finds nothing.
pub const NO_CONTEXT_MESSAGE: &str = "I'm sorry, I don't have information about that. \
     Please ask me about our doctors, facilities, or services.";

/// Returned when the generation provider fails.
pub const APOLOGY_MESSAGE: &str =
    "I'm having trouble processing your question right now. Please try again.";

/// Separator placed between retrieved chunks in the context block.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Turns retrieved chunks and a question into a final answer string.
///
/// Every failure path ends in a fixed, user-facing sentence; provider errors
/// are logged and never returned.
pub struct AnswerComposer {
    generator: Arc<dyn GenerationProvider>,
    hospital_name: String,
}

impl AnswerComposer {
    /// Create a composer that answers on behalf of `hospital_name`.
    pub fn new(generator: Arc<dyn GenerationProvider>, hospital_name: impl Into<String>) -> Self {
        Self { generator, hospital_name: hospital_name.into() }
    }

    /// Build the grounded prompt for `query` over `chunks`.
    pub fn build_prompt(&self, chunks: &[String], query: &str) -> String {
        let context = chunks.join(CONTEXT_SEPARATOR);
        format!(
            "You are the informational assistant for {hospital}, answering questions \
             about its doctors, schedules, admissions, facilities, and services.\n\
             Use ONLY the following context to answer.\n\
             If the answer is not present in the context, reply exactly: \"{UNKNOWN_ANSWER}\".\n\
             \n\
             CONTEXT:\n\
             {context}\n\
             \n\
             QUESTION:\n\
             {query}\n\
             \n\
             ANSWER:\n",
            hospital = self.hospital_name,
        )
    }

    /// Produce the answer for `query` from the retrieved `chunks`.
    ///
    /// With no chunks the provider is not called and [`NO_CONTEXT_MESSAGE`]
    /// is returned. A provider error yields [`APOLOGY_MESSAGE`]; a blank
    /// reply yields [`UNKNOWN_ANSWER`].
    pub async fn compose(&self, query: &str, chunks: &[String]) -> String {
        if chunks.is_empty() {
            debug!("no context retrieved, skipping generation");
            return NO_CONTEXT_MESSAGE.to_string();
        }

        let prompt = self.build_prompt(chunks, query);
        debug!(
            provider = self.generator.name(),
            prompt_len = prompt.len(),
            chunk_count = chunks.len(),
            "generating answer"
        );

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let answer = text.trim();
                if answer.is_empty() {
                    UNKNOWN_ANSWER.to_string()
                } else {
                    answer.to_string()
                }
            }
            Err(e) => {
                error!(provider = self.generator.name(), error = %e, "generation failed");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }
}
