//! Namespace store trait over a vector database.

use async_trait::async_trait;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::Result;

/// A named-collection vector store.
///
/// A namespace is an independently queryable collection of embedded
/// chunks, addressed by name only; the backing database owns the data and
/// this process holds no copy of stored vectors between requests.
#[async_trait]
pub trait NamespaceStore: Send + Sync {
    /// Add embedded chunks to a namespace.
    ///
    /// Creates the collection on first use, sized to the dimensionality of
    /// the first batch. Duplicate content accumulates; nothing is deduped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`](crate::RagError::DimensionMismatch)
    /// if a batch's vector dimensionality differs from the collection's.
    async fn upsert(&self, namespace: &str, chunks: &[EmbeddedChunk]) -> Result<()>;

    /// Check whether a namespace has a backing collection.
    async fn exists(&self, namespace: &str) -> Result<bool>;

    /// Retrieve the `top_k` nearest neighbors of `vector`, ranked by
    /// descending similarity.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NamespaceNotFound`](crate::RagError::NamespaceNotFound)
    /// if the collection does not exist.
    async fn search(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
