//! End-to-end pipeline tests with deterministic mock providers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ragserve_core::{
    ChatModel, Document, EmbeddingProvider, FixedSizeChunker, InMemoryNamespaceStore,
    NamespaceStore, RagConfig, RagError, RagPipeline, Result,
};

/// Deterministic hash-based embeddings; normalized so cosine similarity is
/// the dot product. Identical text always embeds to the identical vector.
struct MockEmbeddingProvider {
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Echoes the context section of the prompt back as the "answer", so tests
/// can assert the retrieved text reached the model.
struct EchoChatModel;

#[async_trait]
impl ChatModel for EchoChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(format!("Based on the context: {prompt}"))
    }
}

fn build_pipeline(store: Arc<InMemoryNamespaceStore>) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(1000).chunk_overlap(200).top_k(4).build().unwrap())
        .embedding_provider(Arc::new(MockEmbeddingProvider { dimensions: 64 }))
        .chat_model(Arc::new(EchoChatModel))
        .store(store)
        .chunker(Arc::new(FixedSizeChunker::new(1000, 200).unwrap()))
        .build()
        .unwrap()
}

fn text_document(text: &str) -> Document {
    Document::new(text, HashMap::from([("source".to_string(), "text".to_string())]))
}

#[tokio::test]
async fn ingest_then_query_returns_answer_with_sources() {
    let store = Arc::new(InMemoryNamespaceStore::new());
    let pipeline = build_pipeline(store);

    let text = "The sky is blue. Grass is green.";
    let report = pipeline.ingest("t1", &[text_document(text)]).await.unwrap();
    assert_eq!(report.document_count, 1);
    assert_eq!(report.chunk_count, 1);

    let result = pipeline.query("t1", "What color is the sky?").await.unwrap();
    assert!(result.answer.contains("blue"));
    assert!(!result.sources.is_empty());
    assert_eq!(result.sources[0].content, text);
    assert_eq!(result.sources[0].metadata["source"], "text");
}

#[tokio::test]
async fn query_against_unknown_namespace_fails() {
    let store = Arc::new(InMemoryNamespaceStore::new());
    let pipeline = build_pipeline(store);

    let err = pipeline.query("empty", "anything?").await.unwrap_err();
    assert!(matches!(err, RagError::NamespaceNotFound(ns) if ns == "empty"));
}

#[tokio::test]
async fn reingesting_grows_stored_chunk_count() {
    let store = Arc::new(InMemoryNamespaceStore::new());
    let pipeline = build_pipeline(store.clone());

    let doc = text_document("The sky is blue.");
    pipeline.ingest("t1", &[doc.clone()]).await.unwrap();
    let first = store.chunk_count("t1").await.unwrap();
    pipeline.ingest("t1", &[doc]).await.unwrap();
    let second = store.chunk_count("t1").await.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn long_documents_are_split_with_metadata_copied() {
    let store = Arc::new(InMemoryNamespaceStore::new());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(50).chunk_overlap(10).top_k(4).build().unwrap())
        .embedding_provider(Arc::new(MockEmbeddingProvider { dimensions: 64 }))
        .chat_model(Arc::new(EchoChatModel))
        .store(store.clone())
        .chunker(Arc::new(FixedSizeChunker::new(50, 10).unwrap()))
        .build()
        .unwrap();

    let long_text = "word ".repeat(100);
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), "notes.txt".to_string());
    let report =
        pipeline.ingest("long", &[Document::new(long_text, metadata)]).await.unwrap();

    assert!(report.chunk_count > 1);
    let results = store.search("long", &[0.5; 64], report.chunk_count).await.unwrap();
    for result in &results {
        assert_eq!(result.chunk.metadata["source"], "notes.txt");
        assert!(result.chunk.metadata.contains_key("chunk_index"));
    }
}

#[tokio::test]
async fn builder_requires_all_components() {
    let err = RagPipeline::builder().config(RagConfig::default()).build().unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}
