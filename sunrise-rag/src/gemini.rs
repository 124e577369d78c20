//! Gemini embedding and generation providers over the Gemini REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;

/// The default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default model for answer generation.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// The default model for query embeddings.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

const PROVIDER: &str = "Gemini";

/// Connection settings shared by the Gemini providers.
///
/// # Example
///
/// ```rust,ignore
/// use sunrise_rag::gemini::GeminiConfig;
///
/// let config = GeminiConfig::from_env()?
///     .with_generation_model("gemini-2.5-flash-lite")
///     .with_timeout(Duration::from_secs(20));
/// ```
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: String,
    /// Model used by [`GeminiGenerationProvider`].
    pub generation_model: String,
    /// Model used by [`GeminiEmbeddingProvider`].
    pub embedding_model: String,
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout applied to the HTTP client.
    pub timeout: Duration,
    /// Sampling temperature for generation.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Create a config with the given API key and default models.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("Gemini API key must not be empty".into()));
        }

        Ok(Self {
            api_key,
            generation_model: DEFAULT_GENERATION_MODEL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            temperature: None,
            max_output_tokens: None,
        })
    }

    /// Create a config using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RagError::ConfigError("GEMINI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the generation model (e.g. `gemini-2.5-pro`).
    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    /// Set the embedding model. It must match the model behind the corpus embeddings.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Point the providers at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{method}", self.base_url, model_path(model))
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.timeout).build().map_err(|e| {
            RagError::ConfigError(format!("failed to build Gemini HTTP client: {e}"))
        })
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("generation_model", &self.generation_model)
            .field("embedding_model", &self.embedding_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Qualify a bare model name with the `models/` prefix.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") { model.to_string() } else { format!("models/{model}") }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Send a JSON POST and decode the body, mapping failures with `to_error`.
async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &B,
    to_error: impl Fn(String) -> RagError,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: for<'de> Deserialize<'de>,
{
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            to_error(format!("request failed: {e}"))
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail =
            serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

        error!(provider = PROVIDER, %status, "API error");
        return Err(to_error(format!("API returned {status}: {detail}")));
    }

    response.json().await.map_err(|e| {
        error!(provider = PROVIDER, error = %e, "failed to parse response");
        to_error(format!("failed to parse response: {e}"))
    })
}

fn embedding_error(message: String) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message }
}

fn generation_error(message: String) -> RagError {
    RagError::GenerationError { provider: PROVIDER.into(), message }
}

// ── EmbeddingProvider implementation ───────────────────────────────

/// An [`EmbeddingProvider`] backed by the Gemini `embedContent` endpoint.
///
/// Queries are embedded with the `RETRIEVAL_QUERY` task type.
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiEmbeddingProvider {
    /// Create a provider from a [`GeminiConfig`].
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Ok(Self { client: config.http_client()?, config })
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            provider = PROVIDER,
            text_len = text.len(),
            model = %self.config.embedding_model,
            "embedding query"
        );

        let request = EmbedContentRequest {
            model: model_path(&self.config.embedding_model),
            content: Content { role: None, parts: vec![Part { text }] },
            task_type: "RETRIEVAL_QUERY",
        };
        let url = self.config.endpoint(&self.config.embedding_model, "embedContent");

        let response: EmbedContentResponse =
            post_json(&self.client, &url, &self.config.api_key, &request, embedding_error).await?;

        match response.embedding {
            Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
            _ => Err(embedding_error("API returned no embedding values".into())),
        }
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

// ── GenerationProvider implementation ──────────────────────────────

/// A [`GenerationProvider`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerationProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerationProvider {
    /// Create a provider from a [`GeminiConfig`].
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Ok(Self { client: config.http_client()?, config })
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.config.temperature.is_none() && self.config.max_output_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerationProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = PROVIDER,
            prompt_len = prompt.len(),
            model = %self.config.generation_model,
            "generating"
        );

        let request = GenerateContentRequest {
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: prompt }] }],
            generation_config: self.generation_config(),
        };
        let url = self.config.endpoint(&self.config.generation_model, "generateContent");

        let response: GenerateContentResponse =
            post_json(&self.client, &url, &self.config.api_key, &request, generation_error)
                .await?;

        response.text().ok_or_else(|| generation_error("API returned no text candidates".into()))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
