//! The index store: collection lifecycle, buffered writes, ranked search.
//!
//! All mutable write-path state (id counter, pending batch, last-flush
//! instant) lives inside this struct and is reachable only through
//! `&mut self`, so exclusive access is enforced by the borrow checker.
//! Execution is sequential; the interval flush trigger is checked
//! opportunistically inside `index()`, never by a background timer, so a
//! final `flush()` at shutdown is the caller's responsibility.

use crate::store::backend::VectorBackend;
use crate::store::types::{
    CollectionSchema, FlushPolicy, IndexParams, PendingBatch, ScoredChunk, SearchPage,
    SearchParams, REQUIRED_FIELDS,
};
use ragbox_core::config::StoreConfig;
use ragbox_core::{AppError, AppResult};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Construction options for [`IndexStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub collection: String,
    pub dimension: usize,
    pub policy: FlushPolicy,
    pub index: IndexParams,
    pub search: SearchParams,
}

impl StoreOptions {
    /// Build options from configuration plus the probed vector dimension.
    pub fn from_config(config: &StoreConfig, dimension: usize) -> Self {
        Self {
            collection: config.collection.clone(),
            dimension,
            policy: FlushPolicy {
                batch_size: config.batch_size,
                interval: std::time::Duration::from_millis(config.flush_interval_ms),
            },
            index: IndexParams::from_config(&config.index),
            search: SearchParams::from_config(&config.index),
        }
    }
}

/// A named collection with a write-behind buffer.
pub struct IndexStore {
    backend: Box<dyn VectorBackend>,
    collection: String,
    dimension: usize,
    policy: FlushPolicy,
    index_params: IndexParams,
    search_params: SearchParams,

    /// Next id to mint; ids start at 1 and are never reused.
    next_id: i64,
    pending: PendingBatch,
    last_flush: Instant,
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("backend", &self.backend.backend_name())
            .field("collection", &self.collection)
            .field("dimension", &self.dimension)
            .field("policy", &self.policy)
            .field("index_params", &self.index_params)
            .field("search_params", &self.search_params)
            .field("next_id", &self.next_id)
            .field("pending", &self.pending)
            .field("last_flush", &self.last_flush)
            .finish()
    }
}

impl IndexStore {
    /// Open the store, creating or validating its collection.
    ///
    /// Idempotent: a fresh collection is created with the fixed
    /// three-field schema, indexed, and loaded; an existing one is
    /// validated against the required fields and re-loaded. Validation
    /// failure is fatal, re-load failure only warns since the collection
    /// may already be serving.
    pub async fn open(backend: Box<dyn VectorBackend>, options: StoreOptions) -> AppResult<Self> {
        let mut store = Self {
            backend,
            collection: options.collection,
            dimension: options.dimension,
            policy: options.policy,
            index_params: options.index,
            search_params: options.search,
            next_id: 1,
            pending: PendingBatch::default(),
            last_flush: Instant::now(),
        };

        store.ensure_collection().await?;
        Ok(store)
    }

    async fn ensure_collection(&mut self) -> AppResult<()> {
        let name = self.collection.clone();

        if !self.backend.has_collection(&name).await? {
            info!("Creating new collection: {}", name);

            let schema = CollectionSchema::chunks(self.dimension);
            self.backend.create_collection(&name, &schema).await?;
            self.backend
                .create_index(&name, "embedding", &self.index_params)
                .await?;
            self.backend.load_collection(&name).await?;

            return Ok(());
        }

        info!("Collection already exists: {}", name);

        let field_names = self.backend.describe_collection(&name).await?;
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|required| !field_names.iter().any(|f| f == *required))
            .map(|s| s.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::SchemaMismatch { missing });
        }

        // The collection may already be loaded; a failure here is not fatal.
        if let Err(e) = self.backend.load_collection(&name).await {
            warn!("Collection load warning: {}", e);
        }

        Ok(())
    }

    /// Collection name this store owns.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Vector dimension of the collection.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of buffered, unflushed entries.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Buffer one chunk for writing and return its assigned id.
    ///
    /// Ids are minted sequentially in call order. The write is flushed
    /// synchronously before returning when the buffer reaches the batch
    /// size or the flush interval has elapsed; a failed flush propagates
    /// but the entry stays buffered with its id, so a later `flush()`
    /// retry carries it.
    pub async fn index(&mut self, text: &str, vector: Vec<f32>) -> AppResult<i64> {
        let id = self.next_id;
        self.pending.push(id, vector, text.to_string());
        self.next_id += 1;

        if self.pending.len() >= self.policy.batch_size
            || self.last_flush.elapsed() > self.policy.interval
        {
            self.flush().await?;
        }

        Ok(id)
    }

    /// Write all buffered entries in one bulk insert and commit.
    ///
    /// No-op on an empty buffer. A failed insert leaves the buffer
    /// intact for retry. A failed commit after a successful insert is
    /// logged but not propagated; the data is inserted and a later
    /// commit covers it.
    pub async fn flush(&mut self) -> AppResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let count = self.pending.len();
        self.backend.insert(&self.collection, &self.pending).await?;

        if let Err(e) = self.backend.commit(&self.collection).await {
            warn!("Collection commit warning: {}", e);
        }

        self.pending.clear();
        self.last_flush = Instant::now();

        debug!("Flushed {} entries to collection {}", count, self.collection);
        Ok(())
    }

    /// Nearest-neighbor search for a single query vector.
    ///
    /// Returns up to `top_k` hits in the order the engine ranked them,
    /// nearest first, each id paired with its own row of the returned
    /// text column. Only flushed entries are visible.
    pub async fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<ScoredChunk>> {
        let page: SearchPage = self
            .backend
            .search(&self.collection, query, top_k, &self.search_params)
            .await?;

        if page.texts.len() != page.ids.len() || page.distances.len() != page.ids.len() {
            return Err(AppError::Search(format!(
                "Backend returned misaligned result columns: {} ids, {} distances, {} texts",
                page.ids.len(),
                page.distances.len(),
                page.texts.len()
            )));
        }

        let results = page
            .ids
            .iter()
            .zip(page.distances.iter())
            .zip(page.texts.iter())
            .map(|((id, distance), text)| ScoredChunk {
                id: *id,
                text: text.clone(),
                distance: *distance,
            })
            .collect();

        Ok(results)
    }

    /// Lightweight connectivity probe; never propagates.
    pub async fn is_connected(&self) -> bool {
        self.backend.list_collections().await.is_ok()
    }

    /// Flush remaining entries and release the backend.
    ///
    /// Best-effort: failures are logged, never re-thrown, so this is
    /// safe on every exit path including after errors.
    pub async fn close(mut self) {
        if let Err(e) = self.flush().await {
            warn!("Final flush failed during close: {}", e);
        }
        if let Err(e) = self.backend.close().await {
            warn!("Backend close failed: {}", e);
        }
    }
}
