//! Full pipeline tests: chunk, embed, index, then ask against in-memory
//! doubles with rigged vectors.

use super::support::{MockLlm, RecordingBackend, StaticEmbedding};
use crate::embeddings::Embedder;
use crate::service::{RagService, NO_INFORMATION_ANSWER};
use crate::store::memory::MemoryBackend;
use crate::store::types::{FlushPolicy, IndexParams, SearchParams};
use crate::store::{IndexStore, StoreOptions};
use crate::chunker;
use std::sync::Arc;
use std::time::Duration;

async fn open_memory_store() -> IndexStore {
    let options = StoreOptions {
        collection: "chunks".to_string(),
        dimension: 2,
        policy: FlushPolicy {
            batch_size: 50,
            interval: Duration::from_secs(600),
        },
        index: IndexParams::default(),
        search: SearchParams::default(),
    };
    IndexStore::open(Box::new(MemoryBackend::new()), options)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_ask_builds_context_from_nearest_chunks() {
    let provider = Arc::new(
        StaticEmbedding::new(vec![1.0, 1.0])
            .with_vector("ABCD", vec![0.0, 0.0])
            .with_vector("EFGH", vec![10.0, 0.0])
            .with_vector("IJ", vec![0.0, 10.0])
            .with_vector("where is it?", vec![9.8, 0.1]),
    );
    let embedder = Embedder::probe(provider, Some(2)).await.unwrap();
    let store = open_memory_store().await;
    let llm = MockLlm::new();

    let mut service = RagService::new(embedder, store, llm.clone(), "mistral", 3);

    let chunks = chunker::split("ABCDEFGHIJ", 4).unwrap();
    assert_eq!(chunks, vec!["ABCD", "EFGH", "IJ"]);

    let indexed = service.index_all(&chunks).await.unwrap();
    assert_eq!(indexed, 3);

    let answer = service.ask("where is it?").await.unwrap();
    assert_eq!(answer, "answer from mistral");
    assert_eq!(llm.call_count(), 1);

    let prompt = llm.take_last_prompt().unwrap();
    // The closest chunk leads the context and is paired with its own id.
    assert!(prompt.contains("Chunk ID 2: EFGH"));
    assert!(prompt.contains("Question: where is it?"));
    assert!(prompt.starts_with("You are a helpful assistant."));
}

#[tokio::test]
async fn test_ask_without_context_skips_the_model() {
    let provider = Arc::new(StaticEmbedding::new(vec![1.0, 1.0]));
    let embedder = Embedder::probe(provider, Some(2)).await.unwrap();
    let store = open_memory_store().await;
    let llm = MockLlm::new();

    let service = RagService::new(embedder, store, llm.clone(), "mistral", 3);

    let answer = service.ask("anything at all").await.unwrap();
    assert_eq!(answer, NO_INFORMATION_ANSWER);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_close_flushes_buffered_chunks_after_failed_index() {
    let provider = Arc::new(StaticEmbedding::new(vec![1.0, 0.0]));
    let embedder = Embedder::probe(provider, Some(2)).await.unwrap();

    let (backend, counters) = RecordingBackend::new();
    let options = StoreOptions {
        collection: "chunks".to_string(),
        dimension: 2,
        policy: FlushPolicy {
            batch_size: 50,
            interval: Duration::from_secs(600),
        },
        index: IndexParams::default(),
        search: SearchParams::default(),
    };
    let store = IndexStore::open(Box::new(backend), options).await.unwrap();

    let mut service = RagService::new(embedder, store, MockLlm::new(), "mistral", 3);

    service.index_text("kept").await.unwrap();
    // Whitespace-only input fails before reaching the store, leaving the
    // earlier chunk buffered.
    assert!(service.index_text("   ").await.is_err());
    assert_eq!(counters.inserted_rows(), 0);

    // Closing after the failure still flushes the buffered chunk.
    service.close().await;
    assert_eq!(counters.inserted_rows(), 1);
    assert_eq!(counters.commit_count(), 1);
}

#[tokio::test]
async fn test_index_all_makes_chunks_searchable() {
    let provider = Arc::new(
        StaticEmbedding::new(vec![5.0, 5.0])
            .with_vector("close", vec![1.0, 0.0])
            .with_vector("far", vec![100.0, 100.0]),
    );
    let embedder = Embedder::probe(provider, Some(2)).await.unwrap();
    let store = open_memory_store().await;
    let llm = MockLlm::new();

    let mut service =
        RagService::new(embedder, store, llm.clone(), "mistral", 1);
    service
        .index_all(&["close".to_string(), "far".to_string()])
        .await
        .unwrap();

    service.ask("close").await.unwrap();
    let prompt = llm.take_last_prompt().unwrap();
    assert!(prompt.contains("Chunk ID 1: close"));
    assert!(!prompt.contains("far"));

    service.close().await;
}
