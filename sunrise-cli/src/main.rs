use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::DefaultEditor;
use sunrise_cli::{Cli, repl, telemetry};
use sunrise_rag::{
    Corpus, EmbeddingProvider, GeminiEmbeddingProvider, GeminiGenerationProvider,
    HospitalAssistant,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_format);

    let config = cli.rag_config()?;
    let corpus = Corpus::load(&cli.docs, cli.embeddings_path())
        .with_context(|| format!("loading documents from {}", cli.docs.display()))?;

    let gemini = cli.gemini_config()?;
    let generator = Arc::new(GeminiGenerationProvider::new(gemini.clone())?);
    let embedder: Option<Arc<dyn EmbeddingProvider>> = if corpus.has_embeddings() {
        Some(Arc::new(GeminiEmbeddingProvider::new(gemini)?))
    } else {
        None
    };

    let mut builder = HospitalAssistant::builder()
        .config(config)
        .corpus(Arc::new(corpus))
        .generation_provider(generator);
    if let Some(embedder) = embedder {
        builder = builder.embedding_provider(embedder);
    }
    let assistant = builder.build()?;
    info!(mode = %assistant.mode(), "assistant ready");

    if let Some(question) = cli.question.as_deref() {
        println!("{}", assistant.answer_query(question).await);
        return Ok(());
    }

    let mut editor = DefaultEditor::new()?;
    println!(
        "Ask {} about doctors, timings, admissions or facilities. Ctrl-D to quit.",
        assistant.config().hospital_name
    );
    let answered = repl::run(&mut editor, &assistant, &mut std::io::stdout()).await?;
    info!(answered, "session ended");
    Ok(())
}
