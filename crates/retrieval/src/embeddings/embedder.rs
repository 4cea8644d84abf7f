//! Dimension-probing embedding client.
//!
//! Wraps an [`EmbeddingProvider`] and discovers the model's output
//! dimension at construction time by embedding a fixed probe string. The
//! dimension is a property of the remote model; configuration can state an
//! expectation, but the probed value always wins.

use crate::embeddings::provider::EmbeddingProvider;
use ragbox_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed input used for the construction-time dimension probe.
const PROBE_TEXT: &str = "test";

/// Embedding client with a discovered, fixed output dimension.
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
}

impl Embedder {
    /// Construct an embedder by probing the provider once.
    ///
    /// Costs one service call. A failing probe is fatal
    /// (`AppError::Init`): without a known dimension no collection can be
    /// bootstrapped. If `expected_dimension` is given and differs from the
    /// probed value, a warning is logged and the probed value is used.
    pub async fn probe(
        provider: Arc<dyn EmbeddingProvider>,
        expected_dimension: Option<usize>,
    ) -> AppResult<Self> {
        let probe = provider.embed(PROBE_TEXT).await.map_err(|e| {
            AppError::Init(format!(
                "Failed to detect embedding dimension for model '{}': {}",
                provider.model_name(),
                e
            ))
        })?;

        let dimension = probe.len();
        if dimension == 0 {
            return Err(AppError::Init(format!(
                "Embedding model '{}' returned an empty probe vector",
                provider.model_name()
            )));
        }

        match expected_dimension {
            Some(expected) if expected != dimension => {
                warn!(
                    "Expected dimension {} but model '{}' produces {} dimensions",
                    expected,
                    provider.model_name(),
                    dimension
                );
            }
            _ => {}
        }

        info!(
            "Detected embedding dimension {} for model '{}'",
            dimension,
            provider.model_name()
        );

        Ok(Self {
            provider,
            dimension,
        })
    }

    /// The probed output dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Model identifier of the underlying provider.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Embed a single text.
    ///
    /// Fails with `AppError::InvalidInput` for empty or whitespace-only
    /// input before any service call is made.
    pub async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Text cannot be empty or whitespace-only".to_string(),
            ));
        }

        self.provider.embed(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider returning a fixed-size vector for any input.
    #[derive(Debug)]
    struct FixedProvider {
        dimension: usize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FixedProvider {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        fn model_name(&self) -> &str {
            "fixed-test"
        }

        async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
            if self.fail {
                return Err(AppError::Embedding("service unavailable".to_string()));
            }
            Ok(vec![text.len() as f32; self.dimension])
        }
    }

    #[tokio::test]
    async fn test_probe_detects_dimension() {
        let provider = Arc::new(FixedProvider {
            dimension: 768,
            fail: false,
        });
        let embedder = Embedder::probe(provider, None).await.unwrap();
        assert_eq!(embedder.dimension(), 768);
    }

    #[tokio::test]
    async fn test_probe_mismatch_is_non_fatal() {
        let provider = Arc::new(FixedProvider {
            dimension: 768,
            fail: false,
        });
        // Wrong expectation only warns; the detected value wins.
        let embedder = Embedder::probe(provider, Some(1024)).await.unwrap();
        assert_eq!(embedder.dimension(), 768);
    }

    #[tokio::test]
    async fn test_probe_failure_is_fatal() {
        let provider = Arc::new(FixedProvider {
            dimension: 768,
            fail: true,
        });
        let result = Embedder::probe(provider, None).await;
        assert!(matches!(result, Err(AppError::Init(_))));
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_text() {
        let provider = Arc::new(FixedProvider {
            dimension: 8,
            fail: false,
        });
        let embedder = Embedder::probe(provider, None).await.unwrap();

        assert!(matches!(
            embedder.embed("").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            embedder.embed("   \n\t").await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let provider = Arc::new(FixedProvider {
            dimension: 8,
            fail: false,
        });
        let embedder = Embedder::probe(provider, None).await.unwrap();
        let vector = embedder.embed("hello").await.unwrap();
        assert_eq!(vector.len(), 8);
    }
}
