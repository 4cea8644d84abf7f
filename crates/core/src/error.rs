//! Error types for ragbox.
//!
//! This module defines a unified error enum covering every failure category
//! in the pipeline: configuration, I/O, embedding, vector-store writes and
//! searches, and LLM generation.

use thiserror::Error;

/// Unified error type for ragbox.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad caller input (empty or whitespace-only text)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Startup failure: embedding dimension probe or collection bootstrap.
    /// Fatal — the process aborts rather than running half-initialized.
    #[error("Initialization failed: {0}")]
    Init(String),

    /// A pre-existing collection does not carry the required fields.
    /// Fatal at startup; `missing` lists exactly the absent field names.
    #[error("Collection schema mismatch, missing fields: {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    /// Bulk insert into the vector store failed. The write buffer is
    /// preserved so the caller may retry the flush.
    #[error("Write error: {0}")]
    Write(String),

    /// Nearest-neighbor search failed
    #[error("Search error: {0}")]
    Search(String),

    /// Embedding service call failed after construction
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM generation call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
