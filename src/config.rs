//! Configuration for the retriever.

use serde::{Deserialize, Serialize};

use crate::error::{RetrievalError, Result};

/// Configuration parameters for a [`Retriever`](crate::retriever::Retriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrieverConfig {
    /// Number of top results to return from similarity search.
    pub top_k: usize,
    /// Minimum relevance score for returned results; results below this are
    /// filtered out after ranking. The default of `-1.0` keeps every cosine
    /// result.
    pub score_threshold: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { top_k: 5, score_threshold: -1.0 }
    }
}

impl RetrieverConfig {
    /// Create a new builder for constructing a [`RetrieverConfig`].
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// The fields are public, so a hand-built config can bypass the
    /// builder; every consumer re-validates through this.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if:
    /// - `top_k == 0`
    /// - `score_threshold` lies outside the cosine score range `[-1, 1]`
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be greater than zero".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.score_threshold) {
            return Err(RetrievalError::Config(format!(
                "score_threshold ({}) must lie within [-1, 1]",
                self.score_threshold
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RetrieverConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    /// Set the number of top results to return from similarity search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum relevance score for returned results.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.config.score_threshold = threshold;
        self
    }

    /// Build the [`RetrieverConfig`], validating that parameters are
    /// consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if:
    /// - `top_k == 0`
    /// - `score_threshold` lies outside the cosine score range `[-1, 1]`
    pub fn build(self) -> Result<RetrieverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
