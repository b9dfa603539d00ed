//! Error types for the `fragment-retrieval` crate.

use thiserror::Error;

/// Errors that can occur during retrieval.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The embedding backend failed or the input could not be processed.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The fragment store could not be reached or the search query failed.
    ///
    /// Not retried here; callers may retry with backoff.
    #[error("Fragment store unavailable ({backend}): {message}")]
    StoreUnavailable {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The query embedding dimensionality disagrees with stored embeddings.
    ///
    /// This means the embedding model was swapped without reindexing the
    /// store. Retrying cannot succeed.
    #[error("Embedding dimension mismatch: store has {expected}, query has {actual}")]
    DimensionMismatch {
        /// Dimensionality of the stored fragment embeddings.
        expected: usize,
        /// Dimensionality of the query embedding.
        actual: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
