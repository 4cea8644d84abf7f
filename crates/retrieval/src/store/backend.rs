//! Vector store backend abstraction and factory.

use crate::store::memory::MemoryBackend;
use crate::store::milvus::MilvusBackend;
use crate::store::types::{CollectionSchema, IndexParams, PendingBatch, SearchPage, SearchParams};
use ragbox_core::config::StoreConfig;
use ragbox_core::{AppError, AppResult};

/// Trait for vector database backends.
///
/// Covers exactly the operations the store consumes: collection
/// bootstrap, bulk column insert with an explicit durable commit, and a
/// single-vector nearest-neighbor search returning ranked columnar rows.
#[async_trait::async_trait]
pub trait VectorBackend: Send + Sync {
    /// Get backend name (e.g., "milvus", "memory")
    fn backend_name(&self) -> &str;

    /// Whether the named collection exists.
    async fn has_collection(&self, name: &str) -> AppResult<bool>;

    /// Field names of an existing collection.
    async fn describe_collection(&self, name: &str) -> AppResult<Vec<String>>;

    /// Create a collection with the given schema.
    async fn create_collection(&mut self, name: &str, schema: &CollectionSchema) -> AppResult<()>;

    /// Build a similarity index over a vector field.
    async fn create_index(
        &mut self,
        name: &str,
        field: &str,
        params: &IndexParams,
    ) -> AppResult<()>;

    /// Load the collection into serving memory.
    async fn load_collection(&mut self, name: &str) -> AppResult<()>;

    /// Bulk insert the buffered columns. Does not imply durability.
    async fn insert(&mut self, name: &str, batch: &PendingBatch) -> AppResult<()>;

    /// Synchronous flush: blocks until previous inserts are durable and
    /// searchable.
    async fn commit(&mut self, name: &str) -> AppResult<()>;

    /// One nearest-neighbor query for a single vector, requesting id and
    /// text output fields, ranked nearest first.
    async fn search(
        &self,
        name: &str,
        query: &[f32],
        top_k: usize,
        params: &SearchParams,
    ) -> AppResult<SearchPage>;

    /// List all collection names. Used as a lightweight health probe.
    async fn list_collections(&self) -> AppResult<Vec<String>>;

    /// Release the connection. Best-effort; default is a no-op.
    async fn close(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Create a vector backend based on configuration.
pub fn create_backend(config: &StoreConfig) -> AppResult<Box<dyn VectorBackend>> {
    match config.backend.as_str() {
        "milvus" => Ok(Box::new(MilvusBackend::new(&config.host, config.port)?)),
        "memory" => Ok(Box::new(MemoryBackend::new())),
        _ => Err(AppError::Config(format!(
            "Unknown store backend: '{}'. Supported backends: milvus, memory",
            config.backend
        ))),
    }
}
