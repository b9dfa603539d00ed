//! In-memory fragment store using an exact cosine-distance scan.
//!
//! This module provides [`InMemoryFragmentStore`], a zero-dependency store
//! backed by a `HashMap` protected by a `tokio::sync::RwLock`. It is
//! suitable for development, testing, and small-scale deployments.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{RetrievalError, Result};
use crate::fragment::{Fragment, SearchResult};
use crate::store::FragmentStore;

/// An in-memory [`FragmentStore`] using exact cosine distance for search.
///
/// Fragments are keyed by id. All operations are async-safe via
/// `tokio::sync::RwLock`; searches take a read lock, so concurrent queries
/// do not serialize against each other.
///
/// The store enforces a single embedding dimensionality: the first inserted
/// fragment fixes it, and later inserts or queries with a different
/// dimensionality are rejected.
#[derive(Debug, Default)]
pub struct InMemoryFragmentStore {
    fragments: RwLock<HashMap<String, Fragment>>,
}

impl InMemoryFragmentStore {
    /// Create a new empty in-memory fragment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fragment, replacing any existing fragment with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::DimensionMismatch`] if the fragment's
    /// embedding dimensionality disagrees with fragments already stored.
    pub async fn insert(&self, fragment: Fragment) -> Result<()> {
        let mut fragments = self.fragments.write().await;
        if let Some(existing) = fragments.values().next() {
            if existing.embedding.len() != fragment.embedding.len() {
                return Err(RetrievalError::DimensionMismatch {
                    expected: existing.embedding.len(),
                    actual: fragment.embedding.len(),
                });
            }
        }
        fragments.insert(fragment.id.clone(), fragment);
        Ok(())
    }

    /// Insert a batch of fragments.
    ///
    /// Fails on the first fragment whose embedding dimensionality disagrees
    /// with fragments already stored; earlier fragments in the batch remain
    /// inserted.
    pub async fn insert_batch(&self, fragments: Vec<Fragment>) -> Result<()> {
        for fragment in fragments {
            self.insert(fragment).await?;
        }
        Ok(())
    }

    /// Remove all stored fragments.
    pub async fn clear(&self) {
        self.fragments.write().await.clear();
    }

    /// Return the number of stored fragments.
    pub async fn len(&self) -> usize {
        self.fragments.read().await.len()
    }

    /// Return `true` if the store holds no fragments.
    pub async fn is_empty(&self) -> bool {
        self.fragments.read().await.is_empty()
    }
}

/// Compute cosine distance (`1 - cosine_similarity`) between two vectors.
///
/// Similarity is the dot product over the L2 norms. A zero-magnitude vector
/// has no direction; its similarity to anything is taken as 0.0, giving a
/// distance of 1.0.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl FragmentStore for InMemoryFragmentStore {
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let fragments = self.fragments.read().await;

        // Empty store is a successful search with no results.
        let Some(any) = fragments.values().next() else {
            return Ok(Vec::new());
        };
        if any.embedding.len() != query_embedding.len() {
            return Err(RetrievalError::DimensionMismatch {
                expected: any.embedding.len(),
                actual: query_embedding.len(),
            });
        }

        let mut scored: Vec<(&Fragment, f32)> = fragments
            .values()
            .map(|fragment| (fragment, cosine_distance(&fragment.embedding, query_embedding)))
            .collect();

        // Ascending distance; exact ties break by fragment id so repeated
        // searches are reproducible.
        scored.sort_by(|(fa, da), (fb, db)| {
            da.partial_cmp(db).unwrap_or(Ordering::Equal).then_with(|| fa.id.cmp(&fb.id))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(fragment, distance)| SearchResult::from_fragment(fragment, distance))
            .collect())
    }

    async fn dimensions(&self) -> Result<Option<usize>> {
        let fragments = self.fragments.read().await;
        Ok(fragments.values().next().map(|fragment| fragment.embedding.len()))
    }
}
