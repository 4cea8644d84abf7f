//! Command handlers for the ragbox CLI.

mod ask;
mod chat;
mod ingest;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;

use ragbox_core::{config::AppConfig, AppResult};
use ragbox_llm::create_client;
use ragbox_retrieval::{
    create_backend, create_provider, Embedder, IndexStore, RagService, StoreOptions,
};

/// Wire up the full pipeline from configuration: probe the embedding
/// model's dimension, open (or create) the collection, and connect the
/// language model.
pub async fn build_service(config: &AppConfig) -> AppResult<RagService> {
    let provider = create_provider(&config.embedding)?;
    let embedder = Embedder::probe(provider, config.embedding.expected_dimension).await?;
    tracing::info!(
        "Embedding model {} ready (dimension {})",
        embedder.model_name(),
        embedder.dimension()
    );

    let backend = create_backend(&config.store)?;
    let options = StoreOptions::from_config(&config.store, embedder.dimension());
    let store = IndexStore::open(backend, options).await?;

    let llm = create_client(
        &config.llm.provider,
        Some(&config.llm.endpoint),
        config.llm.timeout_secs,
    )?;

    Ok(RagService::new(
        embedder,
        store,
        llm,
        config.llm.model.clone(),
        config.top_k,
    ))
}

/// Index a list of chunks with printed progress, flushing the remainder
/// at the end. Stops at the first failure; the caller still owns the
/// service and is responsible for closing it.
pub async fn ingest_chunks(service: &mut RagService, chunks: &[String]) -> AppResult<()> {
    let total = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        let id = service.index_text(chunk).await?;
        let done = i + 1;
        println!(
            "Indexed chunk {} ({}/{}, {}%)",
            id,
            done,
            total,
            done * 100 / total
        );
    }
    service.flush().await
}
