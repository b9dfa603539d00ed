//! Local embedding backend using fastembed (ONNX inference).
//!
//! This module is only available when the `fastembed` feature is enabled.
//! The default model is `paraphrase-multilingual-MiniLM-L12-v2`, a
//! multilingual sentence-embedding model producing 384-dimension vectors.
//! The model is downloaded and loaded once at construction; inference runs
//! on the tokio blocking pool so async callers are not stalled.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::embedding::Embedder;
use crate::error::{RetrievalError, Result};

/// Dimensionality of `paraphrase-multilingual-MiniLM-L12-v2` embeddings.
const MULTILINGUAL_MINILM_DIMENSIONS: usize = 384;

/// An [`Embedder`] backed by local ONNX inference via
/// [fastembed](https://docs.rs/fastembed).
///
/// Inference is deterministic: the same text against the same model always
/// yields the same vector. The empty string is a valid input; the model
/// returns its embedding of the empty token sequence.
///
/// # Example
///
/// ```rust,ignore
/// use fragment_retrieval::local::FastEmbedder;
///
/// let embedder = FastEmbedder::multilingual()?;
/// let embedding = embedder.embed("hola mundo").await?;
/// assert_eq!(embedding.len(), 384);
/// ```
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

impl FastEmbedder {
    /// Load the default multilingual model
    /// (`paraphrase-multilingual-MiniLM-L12-v2`, 384 dimensions).
    pub fn multilingual() -> Result<Self> {
        Self::new(EmbeddingModel::ParaphraseMLMiniLML12V2, MULTILINGUAL_MINILM_DIMENSIONS)
    }

    /// Load a specific fastembed model with its known output
    /// dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Embedding`] if the model cannot be
    /// downloaded or initialized.
    pub fn new(model: EmbeddingModel, dimensions: usize) -> Result<Self> {
        let model_name = format!("{model:?}");
        let text_embedding =
            TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
                .map_err(|e| RetrievalError::Embedding {
                    provider: "fastembed".to_string(),
                    message: format!("failed to load model {model_name}: {e}"),
                })?;
        Ok(Self { model: Arc::new(text_embedding), model_name, dimensions })
    }

    /// Run inference on the blocking pool.
    async fn embed_owned(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let embeddings = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| RetrievalError::Embedding {
                provider: "fastembed".to_string(),
                message: format!("inference task failed: {e}"),
            })?
            .map_err(|e| RetrievalError::Embedding {
                provider: "fastembed".to_string(),
                message: e.to_string(),
            })?;
        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "fastembed", model = %self.model_name, text_len = text.len(), "embedding text");

        let mut embeddings = self.embed_owned(vec![text.to_string()]).await?;
        embeddings.pop().ok_or_else(|| RetrievalError::Embedding {
            provider: "fastembed".to_string(),
            message: "model returned no embedding".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "fastembed",
            model = %self.model_name,
            batch_size = texts.len(),
            "embedding batch"
        );

        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = self.embed_owned(owned).await?;
        if embeddings.len() != texts.len() {
            return Err(RetrievalError::Embedding {
                provider: "fastembed".to_string(),
                message: format!(
                    "model returned {} embeddings for {} inputs",
                    embeddings.len(),
                    texts.len()
                ),
            });
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
