//! Shared test doubles: a backend that records calls, a deterministic
//! embedding provider, and a scripted language model.

use crate::embeddings::EmbeddingProvider;
use crate::store::memory::MemoryBackend;
use crate::store::types::{CollectionSchema, IndexParams, PendingBatch, SearchPage, SearchParams};
use crate::store::VectorBackend;
use ragbox_core::{AppError, AppResult};
use ragbox_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared handles into a [`RecordingBackend`] that stay usable after the
/// backend is boxed and moved into a store.
#[derive(Clone, Default)]
pub struct BackendCounters {
    pub inserts: Arc<AtomicUsize>,
    pub insert_rows: Arc<AtomicUsize>,
    pub commits: Arc<AtomicUsize>,
    pub fail_insert: Arc<AtomicBool>,
}

impl BackendCounters {
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn inserted_rows(&self) -> usize {
        self.insert_rows.load(Ordering::SeqCst)
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }
}

/// A [`MemoryBackend`] wrapper that counts inserts and commits and can be
/// told to reject inserts.
pub struct RecordingBackend {
    inner: MemoryBackend,
    counters: BackendCounters,
}

impl RecordingBackend {
    pub fn new() -> (Self, BackendCounters) {
        let counters = BackendCounters::default();
        let backend = Self {
            inner: MemoryBackend::new(),
            counters: counters.clone(),
        };
        (backend, counters)
    }
}

#[async_trait::async_trait]
impl VectorBackend for RecordingBackend {
    fn backend_name(&self) -> &str {
        "recording"
    }

    async fn has_collection(&self, name: &str) -> AppResult<bool> {
        self.inner.has_collection(name).await
    }

    async fn describe_collection(&self, name: &str) -> AppResult<Vec<String>> {
        self.inner.describe_collection(name).await
    }

    async fn create_collection(&mut self, name: &str, schema: &CollectionSchema) -> AppResult<()> {
        self.inner.create_collection(name, schema).await
    }

    async fn create_index(&mut self, name: &str, field: &str, params: &IndexParams) -> AppResult<()> {
        self.inner.create_index(name, field, params).await
    }

    async fn load_collection(&mut self, name: &str) -> AppResult<()> {
        self.inner.load_collection(name).await
    }

    async fn insert(&mut self, name: &str, batch: &PendingBatch) -> AppResult<()> {
        if self.counters.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::Write("Injected insert failure".to_string()));
        }
        self.counters.inserts.fetch_add(1, Ordering::SeqCst);
        self.counters
            .insert_rows
            .fetch_add(batch.len(), Ordering::SeqCst);
        self.inner.insert(name, batch).await
    }

    async fn commit(&mut self, name: &str) -> AppResult<()> {
        self.counters.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(name).await
    }

    async fn search(
        &self,
        name: &str,
        query: &[f32],
        top_k: usize,
        params: &SearchParams,
    ) -> AppResult<SearchPage> {
        self.inner.search(name, query, top_k, params).await
    }

    async fn list_collections(&self) -> AppResult<Vec<String>> {
        self.inner.list_collections().await
    }
}

/// Embedding provider returning canned vectors per input text.
#[derive(Debug)]
pub struct StaticEmbedding {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl StaticEmbedding {
    /// All unknown inputs embed to `fallback`; its length fixes the
    /// provider's dimension.
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
        }
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StaticEmbedding {
    fn provider_name(&self) -> &str {
        "static"
    }

    fn model_name(&self) -> &str {
        "static-test"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Language model double that records the prompts it receives.
#[derive(Debug, Default)]
pub struct MockLlm {
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl MockLlm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn take_last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|mut p| p.take())
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(request.prompt.clone());
        }
        Ok(LlmResponse {
            content: format!("answer from {}", request.model),
            model: request.model.clone(),
            usage: LlmUsage::new(0, 0),
        })
    }
}
