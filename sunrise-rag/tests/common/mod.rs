//! Provider test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sunrise_rag::{EmbeddingProvider, GenerationProvider, RagError, Result};

/// Returns a fixed vector per known query text, failing on anything else.
#[derive(Default)]
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    pub calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        Self {
            table: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.get(text).cloned().ok_or_else(|| RagError::EmbeddingError {
            provider: "Table".into(),
            message: format!("no embedding for '{text}'"),
        })
    }

    fn name(&self) -> &str {
        "Table"
    }
}

/// Always fails, simulating an unreachable embedding service.
#[derive(Default)]
pub struct FailingEmbedder {
    pub calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RagError::EmbeddingError {
            provider: "Failing".into(),
            message: "connection refused".into(),
        })
    }

    fn name(&self) -> &str {
        "Failing"
    }
}

/// Records prompts and replies with a canned response (or an error).
pub struct RecordingGenerator {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()), calls: AtomicUsize::new(0), prompts: Default::default() }
    }

    pub fn failing() -> Self {
        Self { reply: None, calls: AtomicUsize::new(0), prompts: Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or_else(|| RagError::GenerationError {
            provider: "Recording".into(),
            message: "deadline exceeded".into(),
        })
    }

    fn name(&self) -> &str {
        "Recording"
    }
}

pub const SCENARIO_DOCS: [&str; 2] =
    ["Dr. Smith, Cardiology, Mon-Fri 9-5", "Visiting hours are 10am-8pm daily"];
