//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] composes a [`Chunker`], an [`EmbeddingProvider`],
//! a [`NamespaceStore`], and a [`ChatModel`] into the two operations the
//! service exposes: ingesting documents into a namespace and answering a
//! question from it.

use std::sync::Arc;

use tracing::{error, info};

use crate::chat::ChatModel;
use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{
    Chunk, Document, EmbeddedChunk, IngestReport, QueryResult, SearchResult, Source,
};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::store::NamespaceStore;

/// The RAG pipeline orchestrator.
///
/// Holds process-wide handles to the external collaborators; construction
/// happens once at startup via [`RagPipeline::builder()`] and the pipeline
/// is shared across requests without per-request mutation.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chat_model: Arc<dyn ChatModel>,
    store: Arc<dyn NamespaceStore>,
    chunker: Arc<dyn Chunker>,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest documents into a namespace: chunk → embed → upsert.
    ///
    /// All-or-nothing per request: the first failure aborts the whole
    /// ingestion. No rollback is attempted for whatever the vector
    /// database already committed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] when embedding or storage fails, or
    /// propagates store-level errors such as
    /// [`RagError::DimensionMismatch`].
    pub async fn ingest(&self, namespace: &str, documents: &[Document]) -> Result<IngestReport> {
        let chunks: Vec<Chunk> =
            documents.iter().flat_map(|doc| self.chunker.chunk(doc)).collect();

        if chunks.is_empty() {
            info!(namespace, document_count = documents.len(), "nothing to ingest");
            return Ok(IngestReport { document_count: documents.len(), chunk_count: 0 });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(namespace, error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!("embedding failed for namespace '{namespace}': {e}"))
        })?;

        let embedded: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, vector)| EmbeddedChunk { chunk, vector })
            .collect();

        self.store.upsert(namespace, &embedded).await.map_err(|e| match e {
            RagError::DimensionMismatch { .. } => e,
            other => {
                error!(namespace, error = %other, "upsert failed during ingestion");
                RagError::Pipeline(format!("upsert failed for namespace '{namespace}': {other}"))
            }
        })?;

        let report =
            IngestReport { document_count: documents.len(), chunk_count: embedded.len() };
        info!(
            namespace,
            document_count = report.document_count,
            chunk_count = report.chunk_count,
            "ingested documents"
        );
        Ok(report)
    }

    /// Answer a question from a namespace: embed → retrieve → generate.
    ///
    /// Each query is independent; no conversation state is carried over.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NamespaceNotFound`] if the namespace has never
    /// been ingested into, and [`RagError::Pipeline`] if embedding,
    /// retrieval, or generation fails.
    pub async fn query(&self, namespace: &str, question: &str) -> Result<QueryResult> {
        if !self.store.exists(namespace).await? {
            return Err(RagError::NamespaceNotFound(namespace.to_string()));
        }

        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(namespace, error = %e, "embedding failed during query");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        let results = self
            .store
            .search(namespace, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| match e {
                RagError::NamespaceNotFound(_) => e,
                other => {
                    error!(namespace, error = %other, "vector search failed");
                    RagError::Pipeline(format!(
                        "search failed in namespace '{namespace}': {other}"
                    ))
                }
            })?;

        let prompt = build_prompt(question, &results);
        let answer = self.chat_model.complete(&prompt).await.map_err(|e| {
            error!(namespace, error = %e, "answer generation failed");
            RagError::Pipeline(format!("generation failed for namespace '{namespace}': {e}"))
        })?;

        let sources = results
            .into_iter()
            .map(|r| Source { content: r.chunk.text, metadata: r.chunk.metadata })
            .collect::<Vec<_>>();

        info!(namespace, source_count = sources.len(), "query completed");
        Ok(QueryResult { answer, sources })
    }
}

/// Build a stuff-style prompt: retrieved chunk texts as context, followed
/// by the question and an instruction to answer strictly from the context.
fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    let context = results
        .iter()
        .map(|r| r.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
         If the answer is not contained in the context, say that you don't know; \
         do not make up an answer.\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\
         Helpful Answer:"
    )
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required; [`build()`](RagPipelineBuilder::build)
/// validates and produces the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    chat_model: Option<Arc<dyn ChatModel>>,
    store: Option<Arc<dyn NamespaceStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the chat model used for answer generation.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Set the namespace store backend.
    pub fn store(mut self, store: Arc<dyn NamespaceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| RagError::Config("chat_model is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::Config("store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, chat_model, store, chunker })
    }
}
