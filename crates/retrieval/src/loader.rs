//! Document loading.

use crate::chunker;
use ragbox_core::AppResult;
use std::path::Path;

/// Load a UTF-8 document from `path` and split it into fixed-size chunks.
pub fn load_chunks(path: &Path, chunk_size: usize) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let chunks = chunker::split(&content, chunk_size)?;

    tracing::info!(
        "Loaded {} chunks from {:?} (chunk_size: {})",
        chunks.len(),
        path,
        chunk_size
    );

    Ok(chunks)
}
