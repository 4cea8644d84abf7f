//! In-process vector backend with exact L2 scan.
//!
//! Serves tests and offline runs (`--store memory`). Ranking is an exact
//! scan, so results are what an IVF index approximates.

use crate::store::backend::VectorBackend;
use crate::store::types::{
    CollectionSchema, IndexParams, PendingBatch, SearchPage, SearchParams,
};
use ragbox_core::{AppError, AppResult};
use std::collections::HashMap;

#[derive(Debug)]
struct MemoryRow {
    id: i64,
    vector: Vec<f32>,
    text: String,
}

#[derive(Debug)]
struct MemoryCollection {
    schema: CollectionSchema,
    rows: Vec<MemoryRow>,
    loaded: bool,
}

/// In-memory vector backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: HashMap<String, MemoryCollection>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a collection with an arbitrary schema, bypassing the
    /// normal bootstrap. Lets tests simulate a pre-existing collection.
    pub fn seed_collection(&mut self, name: impl Into<String>, schema: CollectionSchema) {
        self.collections.insert(
            name.into(),
            MemoryCollection {
                schema,
                rows: Vec::new(),
                loaded: false,
            },
        );
    }

    /// Number of stored rows in a collection, if it exists.
    pub fn row_count(&self, name: &str) -> Option<usize> {
        self.collections.get(name).map(|c| c.rows.len())
    }

    fn collection(&self, name: &str) -> AppResult<&MemoryCollection> {
        self.collections
            .get(name)
            .ok_or_else(|| AppError::Search(format!("Collection '{}' does not exist", name)))
    }
}

/// Squared L2 distance; ranking-equivalent to L2 and cheaper.
fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[async_trait::async_trait]
impl VectorBackend for MemoryBackend {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn has_collection(&self, name: &str) -> AppResult<bool> {
        Ok(self.collections.contains_key(name))
    }

    async fn describe_collection(&self, name: &str) -> AppResult<Vec<String>> {
        let collection = self
            .collections
            .get(name)
            .ok_or_else(|| AppError::Init(format!("Collection '{}' does not exist", name)))?;
        Ok(collection.schema.field_names())
    }

    async fn create_collection(&mut self, name: &str, schema: &CollectionSchema) -> AppResult<()> {
        if self.collections.contains_key(name) {
            return Err(AppError::Init(format!(
                "Collection '{}' already exists",
                name
            )));
        }

        self.collections.insert(
            name.to_string(),
            MemoryCollection {
                schema: schema.clone(),
                rows: Vec::new(),
                loaded: false,
            },
        );

        Ok(())
    }

    async fn create_index(
        &mut self,
        _name: &str,
        _field: &str,
        _params: &IndexParams,
    ) -> AppResult<()> {
        // Exact scan; index parameters are accepted and ignored.
        Ok(())
    }

    async fn load_collection(&mut self, name: &str) -> AppResult<()> {
        let collection = self
            .collections
            .get_mut(name)
            .ok_or_else(|| AppError::Init(format!("Collection '{}' does not exist", name)))?;
        collection.loaded = true;
        Ok(())
    }

    async fn insert(&mut self, name: &str, batch: &PendingBatch) -> AppResult<()> {
        let collection = self
            .collections
            .get_mut(name)
            .ok_or_else(|| AppError::Write(format!("Collection '{}' does not exist", name)))?;

        for ((id, vector), text) in batch
            .ids
            .iter()
            .zip(batch.vectors.iter())
            .zip(batch.texts.iter())
        {
            collection.rows.push(MemoryRow {
                id: *id,
                vector: vector.clone(),
                text: text.clone(),
            });
        }

        Ok(())
    }

    async fn commit(&mut self, _name: &str) -> AppResult<()> {
        // Rows are immediately durable in memory.
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        query: &[f32],
        top_k: usize,
        _params: &SearchParams,
    ) -> AppResult<SearchPage> {
        let collection = self.collection(name)?;

        let mut scored: Vec<(f32, &MemoryRow)> = collection
            .rows
            .iter()
            .map(|row| (l2_squared(query, &row.vector), row))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let mut page = SearchPage::default();
        for (distance, row) in scored {
            page.ids.push(row.id);
            page.distances.push(distance);
            page.texts.push(row.text.clone());
        }

        Ok(page)
    }

    async fn list_collections(&self) -> AppResult<Vec<String>> {
        Ok(self.collections.keys().cloned().collect())
    }
}
