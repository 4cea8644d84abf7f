//! Orchestration of the full retrieval pipeline: embed, store, search,
//! and answer generation.

use crate::embeddings::Embedder;
use crate::store::IndexStore;
use ragbox_core::AppResult;
use ragbox_llm::{LlmClient, LlmRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Returned verbatim when retrieval produces no context.
pub const NO_INFORMATION_ANSWER: &str = "Sorry, I couldn't find relevant information.";

/// Ties an embedder, an index store, and a language model together.
pub struct RagService {
    embedder: Embedder,
    store: IndexStore,
    llm: Arc<dyn LlmClient>,
    model: String,
    top_k: usize,
}

impl RagService {
    pub fn new(
        embedder: Embedder,
        store: IndexStore,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            model: model.into(),
            top_k,
        }
    }

    /// Embed one chunk of text and buffer it for indexing.
    ///
    /// Returns the id assigned to the chunk.
    pub async fn index_text(&mut self, text: &str) -> AppResult<i64> {
        let vector = self.embedder.embed(text).await?;
        let id = self.store.index(text, vector).await?;
        debug!("Indexed chunk {} ({} chars)", id, text.chars().count());
        Ok(id)
    }

    /// Answer a question from the indexed corpus.
    ///
    /// Embeds the question, retrieves the nearest chunks, and asks the
    /// language model to answer from that context alone. When retrieval
    /// returns nothing the model is never called and a fixed fallback
    /// answer is returned instead.
    pub async fn ask(&self, question: &str) -> AppResult<String> {
        let query = self.embedder.embed(question).await?;
        let hits = self.store.search(&query, self.top_k).await?;

        if hits.is_empty() {
            info!("No relevant chunks found for question");
            return Ok(NO_INFORMATION_ANSWER.to_string());
        }

        let mut context = String::new();
        for hit in &hits {
            context.push_str(&format!("Chunk ID {}: {}\n\n", hit.id, hit.text));
        }

        let prompt = format!(
            "You are a helpful assistant. Use the following context to answer \
             the user's question.\n\nContext:\n{context}\n\nQuestion: {question}\n\nAnswer:"
        );

        let request = LlmRequest::new(prompt, &self.model);
        let response = self.llm.complete(&request).await?;
        Ok(response.content)
    }

    /// Force any buffered chunks out to the store.
    pub async fn flush(&mut self) -> AppResult<()> {
        self.store.flush().await
    }

    /// Whether the store backend is reachable.
    pub async fn is_connected(&self) -> bool {
        self.store.is_connected().await
    }

    /// Flush and release the store; failures are logged, never raised.
    pub async fn close(self) {
        let Self { store, .. } = self;
        store.close().await;
    }
}

/// Helper used by the ingest path to report progress-friendly errors.
impl RagService {
    /// Index a full list of chunks, flushing once at the end.
    pub async fn index_all(&mut self, chunks: &[String]) -> AppResult<usize> {
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            self.index_text(chunk).await?;
            debug!("Ingest progress: {}/{}", i + 1, total);
        }
        if let Err(e) = self.flush().await {
            warn!("Final ingest flush failed: {}", e);
            return Err(e);
        }
        Ok(total)
    }
}
