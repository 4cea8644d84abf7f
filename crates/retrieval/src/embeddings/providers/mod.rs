//! Embedding provider implementations.

pub mod hash;
pub mod ollama;

pub use hash::HashEmbedding;
pub use ollama::OllamaEmbedding;
