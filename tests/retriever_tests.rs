//! Scenario tests for the retriever orchestration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fragment_retrieval::{
    Embedder, Fragment, FragmentStore, InMemoryFragmentStore, RetrievalError, Retriever,
    RetrieverConfig, SearchResult,
};

/// A deterministic embedder backed by a fixed text → vector table.
///
/// Unknown texts (including the empty string) fall back to the unit vector
/// along the first axis, so every input embeds without error.
struct TableEmbedder {
    dimensions: usize,
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbedder {
    fn new(dimensions: usize) -> Self {
        Self { dimensions, table: HashMap::new() }
    }

    fn with(mut self, text: &str, embedding: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), embedding);
        self
    }

    fn fallback(&self) -> Vec<f32> {
        let mut v = vec![0.0; self.dimensions];
        v[0] = 1.0;
        v
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    async fn embed(&self, text: &str) -> fragment_retrieval::Result<Vec<f32>> {
        Ok(self.table.get(text).cloned().unwrap_or_else(|| self.fallback()))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An embedder whose backend is always down.
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> fragment_retrieval::Result<Vec<f32>> {
        Err(RetrievalError::Embedding {
            provider: "stub".to_string(),
            message: "backend unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// An embedder that declares one dimensionality but produces another.
struct LyingEmbedder;

#[async_trait]
impl Embedder for LyingEmbedder {
    async fn embed(&self, _text: &str) -> fragment_retrieval::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// A store that cannot be reached.
struct UnreachableStore;

#[async_trait]
impl FragmentStore for UnreachableStore {
    async fn search(
        &self,
        _query_embedding: &[f32],
        _k: usize,
    ) -> fragment_retrieval::Result<Vec<SearchResult>> {
        Err(RetrievalError::StoreUnavailable {
            backend: "stub".to_string(),
            message: "connection refused".to_string(),
        })
    }

    async fn dimensions(&self) -> fragment_retrieval::Result<Option<usize>> {
        Ok(Some(3))
    }
}

fn fragment(id: &str, embedding: Vec<f32>) -> Fragment {
    Fragment {
        id: id.to_string(),
        text_content: format!("content of {id}"),
        source_url: format!("https://example.com/{id}"),
        parent_document_id: format!("doc_{id}"),
        embedding,
    }
}

async fn retriever_over(
    embedder: TableEmbedder,
    fragments: Vec<Fragment>,
) -> (Retriever, Arc<InMemoryFragmentStore>) {
    let store = Arc::new(InMemoryFragmentStore::new());
    store.insert_batch(fragments).await.unwrap();
    let retriever = Retriever::builder()
        .embedder(Arc::new(embedder))
        .store(Arc::clone(&store) as Arc<dyn fragment_retrieval::FragmentStore>)
        .build()
        .unwrap();
    (retriever, store)
}

/// Three fragments at cosine distances 0.1, 0.4, and 0.9 from the query:
/// k = 2 returns exactly the two closest, in order, with scores 0.9 and 0.6.
#[tokio::test]
async fn known_geometry_top_two() {
    let embedder = TableEmbedder::new(3).with("query", vec![1.0, 0.0, 0.0]);
    let fragments = vec![
        fragment("near", vec![0.9, 0.19f32.sqrt(), 0.0]),
        fragment("mid", vec![0.6, 0.8, 0.0]),
        fragment("far", vec![0.1, 0.99f32.sqrt(), 0.0]),
    ];
    let (retriever, _store) = retriever_over(embedder, fragments).await;

    let results = retriever.retrieve_top("query", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].content, "content of near");
    assert_eq!(results[1].content, "content of mid");
    assert!((results[0].distance - 0.1).abs() < 1e-3, "distance was {}", results[0].distance);
    assert!((results[1].distance - 0.4).abs() < 1e-3, "distance was {}", results[1].distance);
    assert!((results[0].score - 0.9).abs() < 1e-3, "score was {}", results[0].score);
    assert!((results[1].score - 0.6).abs() < 1e-3, "score was {}", results[1].score);
}

#[tokio::test]
async fn results_carry_provenance() {
    let embedder = TableEmbedder::new(3);
    let (retriever, _store) = retriever_over(embedder, vec![fragment("a", vec![1.0, 0.0, 0.0])]).await;

    let results = retriever.retrieve("anything").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://example.com/a");
    assert_eq!(results[0].parent_id, "doc_a");
}

#[tokio::test]
async fn empty_store_returns_empty_list() {
    let (retriever, _store) = retriever_over(TableEmbedder::new(3), Vec::new()).await;

    let results = retriever.retrieve("query").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn k_larger_than_store_returns_all_ranked() {
    let embedder = TableEmbedder::new(3).with("query", vec![1.0, 0.0, 0.0]);
    let fragments = vec![
        fragment("b", vec![0.6, 0.8, 0.0]),
        fragment("a", vec![0.9, 0.19f32.sqrt(), 0.0]),
    ];
    let (retriever, _store) = retriever_over(embedder, fragments).await;

    let results = retriever.retrieve_top("query", 50).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].content, "content of a");
    assert_eq!(results[1].content, "content of b");
}

#[tokio::test]
async fn default_top_k_is_five() {
    let embedder = TableEmbedder::new(3);
    let fragments: Vec<Fragment> = (0..7)
        .map(|i| fragment(&format!("f{i}"), vec![1.0, i as f32 * 0.1, 0.0]))
        .collect();
    let (retriever, _store) = retriever_over(embedder, fragments).await;

    let results = retriever.retrieve("query").await.unwrap();
    assert_eq!(results.len(), 5);
}

/// The empty string is a valid, if low-information, query.
#[tokio::test]
async fn empty_query_text_is_valid() {
    let embedder = TableEmbedder::new(3);
    let (retriever, _store) =
        retriever_over(embedder, vec![fragment("a", vec![0.0, 1.0, 0.0])]).await;

    let results = retriever.retrieve("").await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn dimension_mismatch_is_a_typed_error() {
    // Store holds 3-dimension fragments; the embedder produces 4.
    let embedder = TableEmbedder::new(4);
    let (retriever, _store) =
        retriever_over(embedder, vec![fragment("a", vec![1.0, 0.0, 0.0])]).await;

    let err = retriever.retrieve("query").await.unwrap_err();
    match err {
        RetrievalError::DimensionMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 4);
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

/// Embedding failures surface as their typed variant, never swallowed.
#[tokio::test]
async fn embedding_failure_propagates_untouched() {
    let retriever = Retriever::builder()
        .embedder(Arc::new(FailingEmbedder))
        .store(Arc::new(InMemoryFragmentStore::new()))
        .build()
        .unwrap();

    let err = retriever.retrieve("query").await.unwrap_err();
    match err {
        RetrievalError::Embedding { provider, message } => {
            assert_eq!(provider, "stub");
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("expected Embedding, got {other:?}"),
    }
}

/// Store failures surface as their typed variant, never swallowed.
#[tokio::test]
async fn store_failure_propagates_untouched() {
    let retriever = Retriever::builder()
        .embedder(Arc::new(TableEmbedder::new(3)))
        .store(Arc::new(UnreachableStore))
        .build()
        .unwrap();

    let err = retriever.retrieve("query").await.unwrap_err();
    match err {
        RetrievalError::StoreUnavailable { backend, message } => {
            assert_eq!(backend, "stub");
            assert_eq!(message, "connection refused");
        }
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

/// A backend producing vectors of a different length than it declares is
/// caught before the store is consulted.
#[tokio::test]
async fn embedder_dimension_cross_check() {
    // Empty store: only the embedder-side check can fire.
    let retriever = Retriever::builder()
        .embedder(Arc::new(LyingEmbedder))
        .store(Arc::new(InMemoryFragmentStore::new()))
        .build()
        .unwrap();

    let err = retriever.retrieve("query").await.unwrap_err();
    assert!(matches!(err, RetrievalError::DimensionMismatch { expected: 3, actual: 4 }));
}

#[tokio::test]
async fn identical_calls_yield_identical_results() {
    let embedder = TableEmbedder::new(3).with("query", vec![0.5, 0.5, 0.0]);
    let fragments = vec![
        fragment("a", vec![0.9, 0.19f32.sqrt(), 0.0]),
        fragment("b", vec![0.6, 0.8, 0.0]),
        fragment("c", vec![0.1, 0.99f32.sqrt(), 0.0]),
    ];
    let (retriever, _store) = retriever_over(embedder, fragments).await;

    let first = retriever.retrieve("query").await.unwrap();
    let second = retriever.retrieve("query").await.unwrap();
    assert_eq!(first, second);
}

/// Fragments at exactly equal distance come back in id order.
#[tokio::test]
async fn exact_ties_order_by_fragment_id() {
    let embedder = TableEmbedder::new(3).with("query", vec![1.0, 0.0, 0.0]);
    let fragments = vec![
        fragment("b", vec![0.0, 1.0, 0.0]),
        fragment("a", vec![0.0, 1.0, 0.0]),
        fragment("c", vec![0.0, 1.0, 0.0]),
    ];
    let (retriever, _store) = retriever_over(embedder, fragments).await;

    let results = retriever.retrieve("query").await.unwrap();

    let contents: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["content of a", "content of b", "content of c"]);
}

#[tokio::test]
async fn zero_k_is_rejected() {
    let (retriever, _store) = retriever_over(TableEmbedder::new(3), Vec::new()).await;

    let err = retriever.retrieve_top("query", 0).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Config(_)));
}

#[tokio::test]
async fn score_threshold_filters_low_relevance_results() {
    let embedder = TableEmbedder::new(3).with("query", vec![1.0, 0.0, 0.0]);
    let fragments = vec![
        fragment("near", vec![0.9, 0.19f32.sqrt(), 0.0]),
        fragment("orthogonal", vec![0.0, 1.0, 0.0]),
    ];
    let store = Arc::new(InMemoryFragmentStore::new());
    store.insert_batch(fragments).await.unwrap();

    let config = RetrieverConfig::builder().top_k(5).score_threshold(0.5).build().unwrap();
    let retriever = Retriever::builder()
        .config(config)
        .embedder(Arc::new(embedder))
        .store(store)
        .build()
        .unwrap();

    let results = retriever.retrieve("query").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "content of near");
}

#[test]
fn builder_requires_embedder_and_store() {
    let missing_embedder = Retriever::builder().store(Arc::new(InMemoryFragmentStore::new())).build();
    assert!(matches!(missing_embedder.unwrap_err(), RetrievalError::Config(_)));

    let missing_store = Retriever::builder().embedder(Arc::new(TableEmbedder::new(3))).build();
    assert!(matches!(missing_store.unwrap_err(), RetrievalError::Config(_)));
}

/// Config fields are public; the retriever builder re-validates a
/// hand-built config that bypassed the config builder.
#[test]
fn builder_rejects_hand_built_invalid_config() {
    let config = RetrieverConfig { top_k: 5, score_threshold: 2.0 };
    let err = Retriever::builder()
        .config(config)
        .embedder(Arc::new(TableEmbedder::new(3)))
        .store(Arc::new(InMemoryFragmentStore::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Config(_)));

    let config = RetrieverConfig { top_k: 0, score_threshold: 0.0 };
    let err = Retriever::builder()
        .config(config)
        .embedder(Arc::new(TableEmbedder::new(3)))
        .store(Arc::new(InMemoryFragmentStore::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Config(_)));
}

#[test]
fn config_builder_validates_parameters() {
    assert!(matches!(
        RetrieverConfig::builder().top_k(0).build().unwrap_err(),
        RetrievalError::Config(_)
    ));
    assert!(matches!(
        RetrieverConfig::builder().score_threshold(1.5).build().unwrap_err(),
        RetrievalError::Config(_)
    ));

    let config = RetrieverConfig::default();
    assert_eq!(config.top_k, 5);
}
