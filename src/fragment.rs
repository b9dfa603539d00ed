//! Data types for stored fragments and search results.

use serde::{Deserialize, Serialize};

/// A stored passage of text with provenance metadata and a precomputed
/// embedding.
///
/// Fragments are owned by an external ingestion pipeline; this crate only
/// reads them. Every fragment in a store must carry an embedding of the
/// same dimensionality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fragment {
    /// Unique identifier for the fragment.
    pub id: String,
    /// The stored passage text.
    pub text_content: String,
    /// Provenance locator; may be shared across fragments.
    pub source_url: String,
    /// Identifier of the owning document or topic.
    pub parent_document_id: String,
    /// The fragment's embedding vector.
    pub embedding: Vec<f32>,
}

/// A matched fragment paired with its raw distance and derived score.
///
/// `distance` is cosine distance in [0, 2]; `score` is `1 - distance`, so
/// higher means more similar. Ranking is always by raw distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The matched fragment's text content.
    pub content: String,
    /// The matched fragment's source URL.
    pub url: String,
    /// The matched fragment's parent document identifier.
    pub parent_id: String,
    /// Raw cosine distance between the query and the fragment embedding.
    pub distance: f32,
    /// Relevance score, `1 - distance` (higher is more relevant).
    pub score: f32,
}

impl SearchResult {
    /// Build a result from fragment metadata and a raw cosine distance.
    ///
    /// The score is derived here so both store backends share one
    /// `1 - distance` definition.
    pub fn new(
        content: impl Into<String>,
        url: impl Into<String>,
        parent_id: impl Into<String>,
        distance: f32,
    ) -> Self {
        Self {
            content: content.into(),
            url: url.into(),
            parent_id: parent_id.into(),
            distance,
            score: 1.0 - distance,
        }
    }

    /// Build a result for `fragment` at the given distance from the query.
    pub fn from_fragment(fragment: &Fragment, distance: f32) -> Self {
        Self::new(
            fragment.text_content.clone(),
            fragment.source_url.clone(),
            fragment.parent_document_id.clone(),
            distance,
        )
    }
}
