//! In-memory namespace store using cosine similarity.
//!
//! [`InMemoryNamespaceStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It mirrors the Qdrant backend's contract,
//! including implicit collection creation and dimension checking, and is
//! used for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::store::NamespaceStore;

#[derive(Debug)]
struct Collection {
    dimensions: usize,
    chunks: Vec<EmbeddedChunk>,
}

/// An in-memory [`NamespaceStore`] using cosine similarity for search.
#[derive(Debug, Default)]
pub struct InMemoryNamespaceStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryNamespaceStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of chunks stored in a namespace, if it exists.
    pub async fn chunk_count(&self, namespace: &str) -> Option<usize> {
        let collections = self.collections.read().await;
        collections.get(namespace).map(|c| c.chunks.len())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl NamespaceStore for InMemoryNamespaceStore {
    async fn upsert(&self, namespace: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let dims = chunks[0].vector.len();
        if let Some(bad) = chunks.iter().find(|c| c.vector.len() != dims) {
            return Err(RagError::DimensionMismatch {
                namespace: namespace.to_string(),
                expected: dims,
                actual: bad.vector.len(),
            });
        }

        let mut collections = self.collections.write().await;
        let collection = collections
            .entry(namespace.to_string())
            .or_insert_with(|| Collection { dimensions: dims, chunks: Vec::new() });

        if collection.dimensions != dims {
            return Err(RagError::DimensionMismatch {
                namespace: namespace.to_string(),
                expected: collection.dimensions,
                actual: dims,
            });
        }

        collection.chunks.extend_from_slice(chunks);
        Ok(())
    }

    async fn exists(&self, namespace: &str) -> Result<bool> {
        let collections = self.collections.read().await;
        Ok(collections.contains_key(namespace))
    }

    async fn search(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(namespace)
            .ok_or_else(|| RagError::NamespaceNotFound(namespace.to_string()))?;

        let mut scored: Vec<SearchResult> = collection
            .chunks
            .iter()
            .map(|embedded| SearchResult {
                chunk: embedded.chunk.clone(),
                score: cosine_similarity(&embedded.vector, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
