//! Retriever orchestration: embed a query, search the store, shape results.
//!
//! The [`Retriever`] composes an [`Embedder`] and a [`FragmentStore`] into
//! the single entry point external callers (e.g. an HTTP layer) should use.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fragment_retrieval::{InMemoryFragmentStore, Retriever, RetrieverConfig};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrieverConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .store(Arc::new(InMemoryFragmentStore::new()))
//!     .build()?;
//!
//! let results = retriever.retrieve("¿qué es un vector?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::RetrieverConfig;
use crate::embedding::Embedder;
use crate::error::{RetrievalError, Result};
use crate::fragment::SearchResult;
use crate::store::FragmentStore;

/// The retrieval orchestrator.
///
/// `retrieve` is equivalent to searching the store with the embedding of
/// the query text: embed → dimension check → search → threshold filter.
/// Either the whole call succeeds with a (possibly empty) ranked list, or
/// it fails with exactly one typed error; no partial results.
///
/// The retriever holds its collaborators as shared read-only handles, so a
/// single instance can serve concurrent calls. Construct one via
/// [`Retriever::builder()`].
pub struct Retriever {
    config: RetrieverConfig,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn FragmentStore>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retriever configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Return a reference to the embedder.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Return a reference to the fragment store.
    pub fn store(&self) -> &Arc<dyn FragmentStore> {
        &self.store
    }

    /// Retrieve the configured top-k fragments most similar to
    /// `query_text`.
    ///
    /// Results are ordered by ascending cosine distance (descending score).
    /// An empty store yields an empty list, not an error. The empty string
    /// is a valid query.
    ///
    /// # Errors
    ///
    /// - [`RetrievalError::Embedding`] if the embedding backend fails.
    /// - [`RetrievalError::StoreUnavailable`] if the store cannot be
    ///   reached.
    /// - [`RetrievalError::DimensionMismatch`] if the query embedding
    ///   disagrees with the stored embeddings.
    pub async fn retrieve(&self, query_text: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_top(query_text, self.config.top_k).await
    }

    /// Retrieve with a per-call `k` overriding the configured top-k.
    ///
    /// # Errors
    ///
    /// As [`retrieve`](Retriever::retrieve), plus
    /// [`RetrievalError::Config`] when `k == 0`.
    pub async fn retrieve_top(&self, query_text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(RetrievalError::Config("k must be greater than zero".to_string()));
        }

        // 1. Embed the query.
        let query_embedding = self
            .embedder
            .embed(query_text)
            .await
            .inspect_err(|e| error!(error = %e, "query embedding failed"))?;

        // 2. Cross-check the vector against the dimensionality the backend
        // claims to produce, before the store is consulted.
        let declared = self.embedder.dimensions();
        if query_embedding.len() != declared {
            let err = RetrievalError::DimensionMismatch {
                expected: declared,
                actual: query_embedding.len(),
            };
            error!(error = %err, "embedding backend returned unexpected dimensionality");
            return Err(err);
        }

        // 3. Validate dimensionality against the store before searching.
        if let Some(expected) = self.store.dimensions().await? {
            if expected != query_embedding.len() {
                let err = RetrievalError::DimensionMismatch {
                    expected,
                    actual: query_embedding.len(),
                };
                error!(error = %err, "query embedding does not match store");
                return Err(err);
            }
        }

        // 4. Rank by raw cosine distance in the store.
        let results = self
            .store
            .search(&query_embedding, k)
            .await
            .inspect_err(|e| error!(error = %e, "fragment search failed"))?;

        // 5. Filter by score threshold; ranking order is preserved.
        let threshold = self.config.score_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();

        info!(k, result_count = filtered.len(), "retrieval completed");
        Ok(filtered)
    }
}

/// Builder for constructing a [`Retriever`].
///
/// The embedder and store are required; the config defaults to
/// [`RetrieverConfig::default()`] (top-k 5).
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrieverConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    store: Option<Arc<dyn FragmentStore>>,
}

impl RetrieverBuilder {
    /// Set the retriever configuration.
    pub fn config(mut self, config: RetrieverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedder.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the fragment store.
    pub fn store(mut self, store: Arc<dyn FragmentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the [`Retriever`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if the embedder or store is
    /// missing, or if the configuration fails validation.
    pub fn build(self) -> Result<Retriever> {
        // Config fields are public, so a hand-built config is re-validated
        // here even when the config builder was bypassed.
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedder = self
            .embedder
            .ok_or_else(|| RetrievalError::Config("embedder is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RetrievalError::Config("store is required".to_string()))?;

        Ok(Retriever { config, embedder, store })
    }
}
