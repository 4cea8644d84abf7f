//! Vector ingestion and retrieval for ragbox.
//!
//! This crate holds the core of the system:
//! - [`embeddings`]: embedding providers and the dimension-probing
//!   [`embeddings::Embedder`]
//! - [`store`]: the [`store::IndexStore`] write-behind buffer, collection
//!   bootstrap/validation, and ranked nearest-neighbor search over a
//!   pluggable [`store::VectorBackend`]
//! - [`chunker`] / [`loader`]: fixed-size document chunking
//! - [`service`]: the [`service::RagService`] composition that indexes
//!   chunks and answers questions

pub mod chunker;
pub mod embeddings;
pub mod loader;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{create_provider, Embedder, EmbeddingProvider};
pub use service::RagService;
pub use store::{create_backend, IndexStore, ScoredChunk, StoreOptions, VectorBackend};
