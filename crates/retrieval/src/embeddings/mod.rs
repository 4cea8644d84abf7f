//! Text embedding: provider abstraction and the dimension-probing client.

pub mod embedder;
pub mod provider;
pub mod providers;

pub use embedder::Embedder;
pub use provider::{create_provider, EmbeddingProvider};
