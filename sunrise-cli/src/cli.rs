//! Command-line arguments and the configs derived from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sunrise_rag::{GeminiConfig, RagConfig, VectorBackend};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Ask the Sunrise Hospital assistant about doctors, timings and facilities.
#[derive(Debug, Parser)]
#[command(name = "sunrise", version, about)]
pub struct Cli {
    /// JSON file with the pre-chunked hospital documents.
    #[arg(long, env = "SUNRISE_DOCS")]
    pub docs: PathBuf,

    /// JSON file with one embedding per document, in the same order.
    #[arg(long, env = "SUNRISE_EMBEDDINGS")]
    pub embeddings: Option<PathBuf>,

    /// Vector strategy used when embeddings are available.
    #[arg(long, env = "SUNRISE_VECTOR_BACKEND", default_value = "brute-force")]
    pub vector_backend: VectorBackend,

    /// Ignore embeddings and rank by keywords only.
    #[arg(long)]
    pub keyword_only: bool,

    /// Hospital named in the assistant persona.
    #[arg(long, env = "SUNRISE_HOSPITAL_NAME", default_value = "Sunrise Hospital")]
    pub hospital_name: String,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Gemini model used to compose answers.
    #[arg(long, default_value = sunrise_rag::gemini::DEFAULT_GENERATION_MODEL)]
    pub model: String,

    /// Gemini model used to embed questions; must match the corpus embeddings.
    #[arg(long, default_value = sunrise_rag::gemini::DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Timeout for each provider request, in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Answer a single question and exit instead of starting a prompt.
    #[arg(long, short)]
    pub question: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Retrieval and composition settings.
    pub fn rag_config(&self) -> sunrise_rag::Result<RagConfig> {
        RagConfig::builder()
            .vector_backend(self.vector_backend)
            .hospital_name(self.hospital_name.clone())
            .build()
    }

    /// Provider settings shared by embedding and generation.
    pub fn gemini_config(&self) -> sunrise_rag::Result<GeminiConfig> {
        Ok(GeminiConfig::new(self.api_key.clone())?
            .with_generation_model(self.model.clone())
            .with_embedding_model(self.embedding_model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }

    /// Embeddings path, unless keyword-only mode was requested.
    pub fn embeddings_path(&self) -> Option<&std::path::Path> {
        if self.keyword_only { None } else { self.embeddings.as_deref() }
    }
}
