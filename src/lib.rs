//! Semantic fragment retrieval.
//!
//! Given a free-text query, this crate computes a dense vector embedding
//! and returns the k nearest stored document fragments by cosine
//! similarity, each carrying provenance (source URL, parent document id)
//! and a relevance score in `[-1, 1]`.
//!
//! The crate is the retrieval core only: HTTP transport, request parsing,
//! and fragment ingestion are the caller's concern.
//!
//! # Architecture
//!
//! ```text
//! query text ──▶ Embedder ──▶ query embedding
//!                                   │
//!                                   ▼
//!                          FragmentStore::search
//!                     (ascending cosine distance, top-k)
//!                                   │
//!                                   ▼
//!                       Vec<SearchResult { score = 1 - distance }>
//! ```
//!
//! - [`Embedder`] — text to fixed-dimension vector. Backends: local ONNX
//!   inference (`fastembed` feature) and the Hugging Face Inference API
//!   (`hf-inference` feature).
//! - [`FragmentStore`] — top-k nearest-neighbor search over stored
//!   fragments. Backends: in-memory exact scan (always available) and
//!   PostgreSQL with pgvector (`pgvector` feature).
//! - [`Retriever`] — the composition and the only entry point external
//!   callers should use.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fragment_retrieval::{InMemoryFragmentStore, Retriever};
//!
//! let retriever = Retriever::builder()
//!     .embedder(Arc::new(embedder))
//!     .store(Arc::new(store))
//!     .build()?;
//!
//! for result in retriever.retrieve("gradient descent").await? {
//!     println!("{:.3}  {}  {}", result.score, result.url, result.content);
//! }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod fragment;
pub mod inmemory;
pub mod retriever;
pub mod store;

#[cfg(feature = "hf-inference")]
pub mod hf;
#[cfg(feature = "fastembed")]
pub mod local;
#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use embedding::Embedder;
pub use error::{RetrievalError, Result};
pub use fragment::{Fragment, SearchResult};
pub use inmemory::InMemoryFragmentStore;
pub use retriever::{Retriever, RetrieverBuilder};
pub use store::FragmentStore;

#[cfg(feature = "hf-inference")]
pub use hf::HfInferenceEmbedder;
#[cfg(feature = "fastembed")]
pub use local::FastEmbedder;
#[cfg(feature = "pgvector")]
pub use pgvector::PgVectorStore;
