//! Embedder trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A backend that maps UTF-8 text to a fixed-dimension embedding vector.
///
/// Implementations wrap specific embedding backends (local ONNX inference,
/// hosted APIs, etc.) behind a unified async interface. Construction loads
/// or connects to the model once; embedders are then shared read-only
/// (typically as `Arc<dyn Embedder>`) across concurrent calls.
///
/// Implementations must be deterministic: the same input text against the
/// same model version produces numerically identical output. The empty
/// string is a valid input and must embed without error.
///
/// # Example
///
/// ```rust,ignore
/// use fragment_retrieval::Embedder;
///
/// let embedder = MyEmbedder::new()?;
/// let embedding = embedder.embed("hello world").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](Embedder::embed)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding for better throughput.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this backend.
    fn dimensions(&self) -> usize;
}
