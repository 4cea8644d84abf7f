//! Embedding provider trait and factory.

use ragbox_core::config::EmbeddingConfig;
use ragbox_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// A provider maps text to a fixed-length float vector. The output
/// dimension is a property of the remote model and is discovered by the
/// [`crate::embeddings::Embedder`] at construction time, not configured.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Create an embedding provider based on configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = super::providers::ollama::OllamaEmbedding::new(
                &config.endpoint,
                &config.model,
            )?;
            Ok(Arc::new(provider))
        }

        "mock" => {
            let dimensions = config.expected_dimension.unwrap_or(384);
            if dimensions == 0 {
                return Err(AppError::Config(
                    "expected_dimension must be at least 1 for the mock provider".to_string(),
                ));
            }
            let provider = super::providers::hash::HashEmbedding::new(dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, mock",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_provider() {
        let config = EmbeddingConfig {
            provider: "mock".to_string(),
            expected_dimension: Some(64),
            ..EmbeddingConfig::default()
        };

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "mock");
    }

    #[test]
    fn test_create_ollama_provider() {
        let config = EmbeddingConfig::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[test]
    fn test_create_mock_provider_rejects_zero_dimension() {
        let config = EmbeddingConfig {
            provider: "mock".to_string(),
            expected_dimension: Some(0),
            ..EmbeddingConfig::default()
        };

        let result = create_provider(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("expected_dimension"));
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "unknown".to_string(),
            ..EmbeddingConfig::default()
        };

        let result = create_provider(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }
}
