//! The immutable document corpus and transient retrieval results.
//!
//! A [`Corpus`] is constructed once at startup, wrapped in an `Arc`, and
//! shared read-only by every retrieval strategy. Documents are identified by
//! their position in the corpus.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RagError, Result};

/// A single pre-chunked unit of hospital information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// The text content of the chunk.
    pub text: String,
}

impl Document {
    /// Create a document from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A corpus index paired with a relevance score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoredResult {
    /// Position of the document in the corpus.
    pub index: usize,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}

/// The ordered document set plus optional parallel embeddings.
///
/// When embeddings are present there is exactly one per document and all of
/// them share the same non-zero dimensionality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    documents: Vec<Document>,
    embeddings: Option<Vec<Vec<f32>>>,
}

/// Accepted shapes for entries of the documents file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentEntry {
    Text(String),
    Object { text: String },
}

impl Corpus {
    /// Create a keyword-only corpus from document texts.
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { documents: texts.into_iter().map(Document::new).collect(), embeddings: None }
    }

    /// Create a corpus with one embedding per document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CorpusError`] if the number of embeddings differs
    /// from the number of documents, or if the embeddings do not all share
    /// one non-zero dimensionality.
    pub fn with_embeddings<I, S>(texts: I, embeddings: Vec<Vec<f32>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let corpus = Self::new(texts);
        check_embeddings(corpus.documents.len(), &embeddings)?;
        Ok(Self { embeddings: Some(embeddings), ..corpus })
    }

    /// Load the corpus from a JSON documents file and an optional JSON
    /// embeddings file.
    ///
    /// The documents file holds an array of strings (or of objects with a
    /// `text` field). The embeddings file holds an array of float arrays in
    /// the same order. A missing or malformed embeddings file is not an
    /// error: it is logged once and the corpus is returned keyword-only.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CorpusError`] if the documents file cannot be read
    /// or parsed.
    pub fn load(docs_path: impl AsRef<Path>, embeddings_path: Option<&Path>) -> Result<Self> {
        let docs_path = docs_path.as_ref();
        let raw = fs::read_to_string(docs_path).map_err(|e| {
            RagError::CorpusError(format!("failed to read '{}': {e}", docs_path.display()))
        })?;
        let entries: Vec<DocumentEntry> = serde_json::from_str(&raw).map_err(|e| {
            RagError::CorpusError(format!("failed to parse '{}': {e}", docs_path.display()))
        })?;

        let texts = entries.into_iter().map(|entry| match entry {
            DocumentEntry::Text(text) | DocumentEntry::Object { text } => text,
        });
        let mut corpus = Self::new(texts);

        if let Some(path) = embeddings_path {
            match load_embeddings(path, corpus.documents.len()) {
                Ok(embeddings) => corpus.embeddings = Some(embeddings),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "embeddings unavailable, semantic retrieval disabled"
                    );
                }
            }
        }

        info!(
            documents = corpus.len(),
            dimensions = corpus.dimensions().unwrap_or(0),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents in corpus order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Text of the document at `index`, if any.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.documents.get(index).map(|d| d.text.as_str())
    }

    /// Texts of the documents at the given indices, in the given order.
    ///
    /// Out-of-range indices are skipped.
    pub fn texts(&self, results: &[ScoredResult]) -> Vec<String> {
        results.iter().filter_map(|r| self.text(r.index)).map(str::to_string).collect()
    }

    /// The parallel embeddings, when loaded.
    pub fn embeddings(&self) -> Option<&[Vec<f32>]> {
        self.embeddings.as_deref()
    }

    /// Whether embeddings are available for semantic retrieval.
    pub fn has_embeddings(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Dimensionality shared by all embeddings.
    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.as_ref().and_then(|e| e.first()).map(Vec::len)
    }
}

fn load_embeddings(path: &Path, expected: usize) -> Result<Vec<Vec<f32>>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        RagError::CorpusError(format!("failed to read '{}': {e}", path.display()))
    })?;
    let embeddings: Vec<Vec<f32>> = serde_json::from_str(&raw).map_err(|e| {
        RagError::CorpusError(format!("failed to parse '{}': {e}", path.display()))
    })?;
    check_embeddings(expected, &embeddings)?;
    Ok(embeddings)
}

fn check_embeddings(documents: usize, embeddings: &[Vec<f32>]) -> Result<()> {
    if embeddings.len() != documents {
        return Err(RagError::CorpusError(format!(
            "embedding count ({}) does not match document count ({documents})",
            embeddings.len()
        )));
    }
    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    let dimensions = first.len();
    if dimensions == 0 {
        return Err(RagError::CorpusError("embeddings must not be empty".to_string()));
    }
    if let Some(position) = embeddings.iter().position(|e| e.len() != dimensions) {
        return Err(RagError::CorpusError(format!(
            "embedding {position} has {} dimensions, expected {dimensions}",
            embeddings[position].len()
        )));
    }
    Ok(())
}
