//! Configuration management for ragbox.
//!
//! Configuration is merged from three sources, later ones winning:
//! 1. Built-in defaults
//! 2. A YAML config file (`ragbox.yaml` in the working directory, or the
//!    path in `RAGBOX_CONFIG`)
//! 3. Environment variables (`RAGBOX_*`), then CLI flag overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider identifier ("ollama" or "mock")
    pub provider: String,

    /// Embedding model name
    pub model: String,

    /// Base URL of the embedding service
    pub endpoint: String,

    /// Expected vector dimension. The actual dimension is always probed at
    /// startup; a mismatch here is a logged warning, never an error.
    pub expected_dimension: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            expected_dimension: None,
        }
    }
}

/// Similarity index parameters, passed through to the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index type built over the vector field
    pub index_type: String,

    /// Distance metric
    pub metric: String,

    /// Cluster count for IVF-style indexes
    pub nlist: u32,

    /// Probe count at search time
    pub nprobe: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_type: "IVF_FLAT".to_string(),
            metric: "L2".to_string(),
            nlist: 128,
            nprobe: 10,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend identifier ("milvus" or "memory")
    pub backend: String,

    /// Vector store host
    pub host: String,

    /// Vector store HTTP port
    pub port: u16,

    /// Collection name
    pub collection: String,

    /// Maximum buffered writes before a flush is forced
    pub batch_size: usize,

    /// Maximum milliseconds between flushes, checked on each write
    pub flush_interval_ms: u64,

    /// Index build/search parameters
    pub index: IndexConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "milvus".to_string(),
            host: "localhost".to_string(),
            port: 19530,
            collection: "ragbox_chunks".to_string(),
            batch_size: 50,
            flush_interval_ms: 12_000,
            index: IndexConfig::default(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider identifier (currently only "ollama")
    pub provider: String,

    /// Model name
    pub model: String,

    /// Base URL of the LLM service
    pub endpoint: String,

    /// Per-request timeout. Generation latency is unbounded by design of
    /// the underlying model, so this is a generous fixed bound.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "mistral".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Document ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Path of the document to ingest
    pub path: PathBuf,

    /// Chunk size in characters
    pub chunk_size: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("document.txt"),
            chunk_size: 500,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingConfig,
    pub store: StoreConfig,
    pub llm: GenerationConfig,
    pub document: DocumentConfig,

    /// Number of chunks retrieved per question
    pub top_k: usize,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            store: StoreConfig::default(),
            llm: GenerationConfig::default(),
            document: DocumentConfig::default(),
            top_k: Self::DEFAULT_TOP_K,
            log_level: None,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Default number of retrieved chunks per question.
    pub const DEFAULT_TOP_K: usize = 3;

    /// Load configuration from defaults, config file, and environment.
    ///
    /// Environment variables:
    /// - `RAGBOX_CONFIG`: path to a YAML config file
    /// - `RAGBOX_EMBED_MODEL`: embedding model name
    /// - `RAGBOX_OLLAMA_URL`: base URL for both Ollama services
    /// - `RAGBOX_STORE_HOST` / `RAGBOX_STORE_PORT`: vector store address
    /// - `RAGBOX_COLLECTION`: collection name
    /// - `RAGBOX_DOCUMENT`: document path
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        let config_path = std::env::var("RAGBOX_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ragbox.yaml"));

        if config_path.exists() {
            config = Self::from_file(&config_path)?;
        }

        // Environment variables override file values
        if let Ok(model) = std::env::var("RAGBOX_EMBED_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(url) = std::env::var("RAGBOX_OLLAMA_URL") {
            config.embedding.endpoint = url.clone();
            config.llm.endpoint = url;
        }
        if let Ok(host) = std::env::var("RAGBOX_STORE_HOST") {
            config.store.host = host;
        }
        if let Ok(port) = std::env::var("RAGBOX_STORE_PORT") {
            config.store.port = port
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid RAGBOX_STORE_PORT: {}", e)))?;
        }
        if let Ok(collection) = std::env::var("RAGBOX_COLLECTION") {
            config.store.collection = collection;
        }
        if let Ok(document) = std::env::var("RAGBOX_DOCUMENT") {
            config.document.path = PathBuf::from(document);
        }

        config.log_level = std::env::var("RUST_LOG").ok();
        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Apply CLI flag overrides, which win over file and environment.
    pub fn with_overrides(
        mut self,
        store_backend: Option<String>,
        collection: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(backend) = store_backend {
            self.store.backend = backend;
        }

        if let Some(collection) = collection {
            self.store.collection = collection;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the configuration for the selected providers and backends.
    pub fn validate(&self) -> AppResult<()> {
        let known_embedding = ["ollama", "mock"];
        if !known_embedding.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_embedding.join(", ")
            )));
        }

        let known_backends = ["milvus", "memory"];
        if !known_backends.contains(&self.store.backend.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown store backend: {}. Supported: {}",
                self.store.backend,
                known_backends.join(", ")
            )));
        }

        if self.embedding.expected_dimension == Some(0) {
            return Err(AppError::Config(
                "embedding.expected_dimension must be at least 1".to_string(),
            ));
        }

        if self.store.batch_size == 0 {
            return Err(AppError::Config(
                "store.batch_size must be at least 1".to_string(),
            ));
        }

        if self.document.chunk_size == 0 {
            return Err(AppError::Config(
                "document.chunk_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
