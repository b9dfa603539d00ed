//! Hosted embedding backend using the Hugging Face Inference API.
//!
//! This module is only available when the `hf-inference` feature is
//! enabled. It calls the feature-extraction pipeline of the Inference API,
//! so any hosted sentence-transformers model can be used without local
//! model files.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::Embedder;
use crate::error::{RetrievalError, Result};

/// Base URL of the Inference API feature-extraction pipeline.
const HF_PIPELINE_URL: &str = "https://api-inference.huggingface.co/pipeline/feature-extraction";

/// The default hosted model.
const DEFAULT_MODEL: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

/// The default dimensionality for the default model.
const DEFAULT_DIMENSIONS: usize = 384;

/// An [`Embedder`] backed by the Hugging Face Inference API.
///
/// # Configuration
///
/// - `model` – defaults to
///   `sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2`.
/// - `api_token` – from the constructor or the `HF_API_TOKEN` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use fragment_retrieval::hf::HfInferenceEmbedder;
///
/// let embedder = HfInferenceEmbedder::new("hf_...")?;
/// let embedding = embedder.embed("hello world").await?;
/// ```
pub struct HfInferenceEmbedder {
    client: reqwest::Client,
    api_token: String,
    model: String,
    dimensions: usize,
}

impl HfInferenceEmbedder {
    /// Create a new embedder with the given API token.
    ///
    /// Uses the default multilingual model (384 dimensions).
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(RetrievalError::Embedding {
                provider: "HuggingFace".into(),
                message: "API token must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_token,
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new embedder using the `HF_API_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("HF_API_TOKEN").map_err(|_| RetrievalError::Embedding {
            provider: "HuggingFace".into(),
            message: "HF_API_TOKEN environment variable not set".into(),
        })?;
        Self::new(api_token)
    }

    /// Set the hosted model and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

// ── Inference API request/response types ───────────────────────────

#[derive(Serialize)]
struct PipelineRequest<'a> {
    inputs: Vec<&'a str>,
    options: PipelineOptions,
}

#[derive(Serialize)]
struct PipelineOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Embedder implementation ────────────────────────────────────────

#[async_trait]
impl Embedder for HfInferenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "HuggingFace", text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RetrievalError::Embedding {
            provider: "HuggingFace".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "HuggingFace",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = PipelineRequest {
            inputs: texts.to_vec(),
            options: PipelineOptions { wait_for_model: true },
        };

        let url = format!("{HF_PIPELINE_URL}/{}", self.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "HuggingFace", error = %e, "request failed");
                RetrievalError::Embedding {
                    provider: "HuggingFace".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "HuggingFace", %status, "API error");
            return Err(RetrievalError::Embedding {
                provider: "HuggingFace".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embeddings: Vec<Vec<f32>> = response.json().await.map_err(|e| {
            error!(provider = "HuggingFace", error = %e, "failed to parse response");
            RetrievalError::Embedding {
                provider: "HuggingFace".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embeddings.len() != texts.len() {
            return Err(RetrievalError::Embedding {
                provider: "HuggingFace".into(),
                message: format!(
                    "API returned {} embeddings for {} inputs",
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
