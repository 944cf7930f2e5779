//! Error types for the `ragserve-core` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during answer generation.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The chat model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Store {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The queried namespace has no backing collection.
    #[error("namespace '{0}' does not exist")]
    NamespaceNotFound(String),

    /// A batch of vectors does not match the collection's dimensionality.
    #[error(
        "dimension mismatch in namespace '{namespace}': collection expects {expected}, batch has {actual}"
    )]
    DimensionMismatch {
        /// The affected namespace.
        namespace: String,
        /// The dimensionality the collection was created with.
        expected: usize,
        /// The dimensionality of the offending batch.
        actual: usize,
    },

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
