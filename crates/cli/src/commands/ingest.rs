//! Ingest command handler.
//!
//! Chunks a document, embeds each chunk, and writes them to the vector
//! store, flushing any remainder at the end.

use clap::Args;
use ragbox_core::{config::AppConfig, AppResult};
use ragbox_retrieval::loader;
use std::path::PathBuf;

/// Ingest a document into the vector store
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Document to ingest (default: configured document path)
    pub path: Option<PathBuf>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let path = self.path.as_ref().unwrap_or(&config.document.path);
        let chunk_size = self.chunk_size.unwrap_or(config.document.chunk_size);

        tracing::info!("Ingesting {:?} with chunk size {}", path, chunk_size);
        let chunks = loader::load_chunks(path, chunk_size)?;
        println!("Loaded {} chunks from {:?}", chunks.len(), path);

        let mut service = super::build_service(config).await?;

        // The store is closed on every exit path so buffered chunks get a
        // final flush attempt even when ingestion fails partway.
        let outcome = super::ingest_chunks(&mut service, &chunks).await;
        if outcome.is_ok() {
            println!(
                "Ingested {} chunks into {}",
                chunks.len(),
                config.store.collection
            );
        }

        service.close().await;
        outcome
    }
}
