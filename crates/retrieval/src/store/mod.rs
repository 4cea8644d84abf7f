//! Vector store: collection bootstrap, the write-behind buffer, and
//! ranked nearest-neighbor search.

pub mod backend;
pub mod index_store;
pub mod memory;
pub mod milvus;
pub mod types;

pub use backend::{create_backend, VectorBackend};
pub use index_store::{IndexStore, StoreOptions};
pub use memory::MemoryBackend;
pub use milvus::MilvusBackend;
pub use types::{
    CollectionSchema, FieldKind, FieldSchema, FlushPolicy, IndexParams, PendingBatch,
    ScoredChunk, SearchPage, SearchParams,
};
