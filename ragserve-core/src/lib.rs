//! Retrieval-Augmented Generation core for ragserve.
//!
//! This crate holds the domain logic of the service: document and chunk
//! types, the fixed-size chunker, the embedding and chat model provider
//! traits with their OpenAI implementations, the [`NamespaceStore`]
//! abstraction over a vector database (Qdrant in production, in-memory for
//! tests), and the [`RagPipeline`] that composes them into the
//! ingest-and-answer workflow.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragserve_core::{FixedSizeChunker, InMemoryNamespaceStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .chat_model(Arc::new(chat))
//!     .store(Arc::new(InMemoryNamespaceStore::new()))
//!     .chunker(Arc::new(FixedSizeChunker::new(1000, 200)?))
//!     .build()?;
//!
//! let report = pipeline.ingest("notes", &documents).await?;
//! let result = pipeline.query("notes", "What color is the sky?").await?;
//! ```

pub mod chat;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod openai;
pub mod pipeline;
pub mod qdrant;
pub mod store;

pub use chat::{ChatModel, OpenAIChatModel};
pub use chunking::{Chunker, FixedSizeChunker};
pub use config::RagConfig;
pub use document::{
    Chunk, Document, EmbeddedChunk, IngestReport, QueryResult, SearchResult, Source,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryNamespaceStore;
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use qdrant::QdrantNamespaceStore;
pub use store::NamespaceStore;
