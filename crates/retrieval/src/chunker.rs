//! Fixed-size text chunking.
//!
//! A naive character-based splitter with no boundary logic: for a text of
//! N characters and chunk size C it yields ceil(N/C) chunks, all of length
//! C except possibly the last, and concatenating the chunks reproduces the
//! input exactly. Semantic splitting is out of scope by design.

use ragbox_core::{AppError, AppResult};

/// Split `text` into chunks of `chunk_size` characters.
///
/// Counts Unicode scalar values, not bytes, so multi-byte input never
/// splits inside a character.
pub fn split(text: &str, chunk_size: usize) -> AppResult<Vec<String>> {
    if chunk_size == 0 {
        return Err(AppError::InvalidInput(
            "chunk_size must be at least 1".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == chunk_size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    tracing::debug!(
        "Split text into {} chunks (chunk_size: {})",
        chunks.len(),
        chunk_size
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_exact_multiple() {
        let chunks = split("abcdef", 2).unwrap();
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_split_with_remainder() {
        let chunks = split("ABCDEFGHIJ", 4).unwrap();
        assert_eq!(chunks, vec!["ABCD", "EFGH", "IJ"]);
    }

    #[test]
    fn test_split_empty() {
        let chunks = split("", 100).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_split_zero_chunk_size() {
        assert!(split("abc", 0).is_err());
    }

    #[test]
    fn test_split_multibyte() {
        let chunks = split("héllo wörld", 3).unwrap();
        assert_eq!(chunks, vec!["hél", "lo ", "wör", "ld"]);
    }

    proptest! {
        #[test]
        fn prop_split_reconstructs_input(text in ".{0,400}", chunk_size in 1usize..50) {
            let chunks = split(&text, chunk_size).unwrap();

            // ceil(N/C) chunks
            let char_count = text.chars().count();
            prop_assert_eq!(chunks.len(), char_count.div_ceil(chunk_size));

            // every chunk is full-size except possibly the last
            for chunk in chunks.iter().take(chunks.len().saturating_sub(1)) {
                prop_assert_eq!(chunk.chars().count(), chunk_size);
            }
            if let Some(last) = chunks.last() {
                prop_assert!(last.chars().count() <= chunk_size);
                prop_assert!(!last.is_empty());
            }

            // concatenation reproduces the input exactly
            prop_assert_eq!(chunks.concat(), text);
        }
    }
}
