//! Fragment store trait for nearest-neighbor search over stored embeddings.

use async_trait::async_trait;

use crate::error::Result;
use crate::fragment::SearchResult;

/// A read-only store of fragments searchable by vector similarity.
///
/// Implementations rank stored fragments by cosine distance against a query
/// embedding. Search never mutates the store; ingestion belongs to an
/// external pipeline.
///
/// # Contract
///
/// - Results are ordered by ascending cosine distance; exact ties are broken
///   by fragment id ascending, so repeated searches are reproducible.
/// - The result count is `min(k, stored fragments)`. An empty store yields
///   an empty sequence, not an error.
/// - A query whose dimensionality disagrees with the stored embeddings
///   fails with [`RetrievalError::DimensionMismatch`](crate::error::RetrievalError::DimensionMismatch),
///   never a silent wrong-distance computation.
///
/// # Example
///
/// ```rust,ignore
/// use fragment_retrieval::{FragmentStore, InMemoryFragmentStore};
///
/// let store = InMemoryFragmentStore::new();
/// store.insert(fragment).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Return the `k` stored fragments closest to `query_embedding`,
    /// ordered by ascending cosine distance.
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Return the dimensionality of the stored embeddings, or `None` when
    /// the store holds no fragments (nothing to mismatch against).
    async fn dimensions(&self) -> Result<Option<usize>>;
}
