//! LLM provider factory.
//!
//! Creates LLM clients from configuration values, keeping provider
//! selection out of the call sites.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use ragbox_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout_secs` - Per-request timeout in seconds
///
/// # Errors
/// Returns `AppError::Config` for unknown providers and
/// `AppError::Generation` if client construction fails.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout_secs: u64,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client =
                OllamaClient::with_options(base_url, Duration::from_secs(timeout_secs))?;
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown LLM provider: {}",
            provider
        ))),
    }
}
