//! Data types for documents, chunks, and query results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A source document produced by a content extractor.
///
/// Immutable once created; the pipeline never mutates document text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The plain-text content of the document.
    pub text: String,
    /// Key-value metadata describing where the text came from.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document from text and metadata.
    pub fn new(text: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self { text: text.into(), metadata }
    }
}

/// A bounded-length fragment of a [`Document`]'s text.
///
/// Carries the parent document's metadata plus a `chunk_index` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
}

/// A [`Chunk`] paired with its embedding vector, ready for storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    /// The chunk being stored.
    pub chunk: Chunk,
    /// The embedding vector; dimensionality is fixed by the embedding model.
    pub vector: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A retrieved source returned alongside a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// The stored chunk text that was supplied to the model as context.
    pub content: String,
    /// The chunk's metadata.
    pub metadata: HashMap<String, String>,
}

/// The result of a query: a generated answer plus the sources it was
/// grounded on. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The model's answer text.
    pub answer: String,
    /// The retrieved chunks the answer was generated from.
    pub sources: Vec<Source>,
}

/// Counts reported after a successful ingestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of source documents ingested.
    pub document_count: usize,
    /// Number of chunks stored across all documents.
    pub chunk_count: usize,
}
