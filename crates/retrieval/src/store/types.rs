//! Shared vector-store types.

use ragbox_core::config::IndexConfig;
use std::time::Duration;

/// Field type within a collection schema.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// 64-bit integer, optionally the primary key
    Int64 { primary: bool },
    /// Fixed-dimension float vector
    FloatVector { dim: usize },
    /// Bounded-length string
    VarChar { max_length: usize },
}

/// A single field of a collection schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Schema of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub fields: Vec<FieldSchema>,
}

/// Maximum stored text length in characters.
pub const TEXT_MAX_LENGTH: usize = 65_535;

/// Field names every chunk collection must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "embedding", "text"];

impl CollectionSchema {
    /// The fixed three-field chunk schema for a given vector dimension.
    pub fn chunks(dimension: usize) -> Self {
        Self {
            fields: vec![
                FieldSchema::new("id", FieldKind::Int64 { primary: true }),
                FieldSchema::new("embedding", FieldKind::FloatVector { dim: dimension }),
                FieldSchema::new(
                    "text",
                    FieldKind::VarChar {
                        max_length: TEXT_MAX_LENGTH,
                    },
                ),
            ],
        }
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// In-memory buffer of unflushed (id, vector, text) triples.
///
/// Columnar so a flush maps directly onto one bulk insert. The three
/// columns always have equal length.
#[derive(Debug, Default)]
pub struct PendingBatch {
    pub ids: Vec<i64>,
    pub vectors: Vec<Vec<f32>>,
    pub texts: Vec<String>,
}

impl PendingBatch {
    pub fn push(&mut self, id: i64, vector: Vec<f32>, text: String) {
        self.ids.push(id);
        self.vectors.push(vector);
        self.texts.push(text);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.vectors.clear();
        self.texts.clear();
    }
}

/// When the write buffer is flushed.
///
/// The size trigger amortizes per-request overhead during bulk ingestion;
/// the interval trigger bounds how long a write can stay unsearchable.
/// Both are checked opportunistically inside `index()`; there is no
/// background timer, so callers issue a final flush at shutdown.
#[derive(Debug, Clone)]
pub struct FlushPolicy {
    /// Buffered entries that force a flush
    pub batch_size: usize,

    /// Elapsed time since the last flush that forces one
    pub interval: Duration,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            batch_size: 50,
            interval: Duration::from_millis(12_000),
        }
    }
}

/// Parameters for building the similarity index over the vector field.
#[derive(Debug, Clone)]
pub struct IndexParams {
    pub index_type: String,
    pub metric: String,
    pub nlist: u32,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            index_type: "IVF_FLAT".to_string(),
            metric: "L2".to_string(),
            nlist: 128,
        }
    }
}

/// Search-time parameters.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub metric: String,
    pub nprobe: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            metric: "L2".to_string(),
            nprobe: 10,
        }
    }
}

impl IndexParams {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            index_type: config.index_type.clone(),
            metric: config.metric.clone(),
            nlist: config.nlist,
        }
    }
}

impl SearchParams {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            metric: config.metric.clone(),
            nprobe: config.nprobe,
        }
    }
}

/// Columnar result of one nearest-neighbor query.
///
/// Rows are in engine rank order, nearest first. The columns have equal
/// length; row `i` of each column belongs to the same hit.
#[derive(Debug, Default, Clone)]
pub struct SearchPage {
    pub ids: Vec<i64>,
    pub distances: Vec<f32>,
    pub texts: Vec<String>,
}

impl SearchPage {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub id: i64,
    pub text: String,
    pub distance: f32,
}
