//! Generation provider trait for composing answers from a prompt.

use async_trait::async_trait;

use crate::error::Result;

/// A large-language-model backend that turns a prompt into text.
///
/// The [`AnswerComposer`](crate::AnswerComposer) owns the prompt policy;
/// implementations only transport the prompt and return the raw reply.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Short name of the backend, used in logs and errors.
    fn name(&self) -> &str;
}
