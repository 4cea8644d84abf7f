//! LLM integration crate for ragbox.
//!
//! Provides a provider-agnostic abstraction for language-model completion.
//! Generation is a single blocking round-trip per request: no retries, no
//! streaming, a fixed generous timeout.
//!
//! # Example
//! ```no_run
//! use ragbox_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new()?;
//! let request = LlmRequest::new("Hello, world!", "mistral");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OllamaClient;
