//! Fixed-size word windows with overlap.

use crate::error::{Error, Result};
use crate::types::{Chunk, FileDescriptor};

/// Window size and overlap, both counted in whitespace-delimited tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { size: 300, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        let config = Self { size, overlap };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfiguration("chunk size must be greater than 0".into()));
        }
        if self.overlap >= self.size {
            return Err(Error::InvalidConfiguration(format!(
                "overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.size
            )));
        }
        Ok(())
    }

    fn step(&self) -> usize {
        self.size - self.overlap
    }
}

/// Split `text` into windows of `size` tokens, consecutive windows sharing
/// `overlap` tokens. The last window may be shorter. Empty text yields no
/// windows.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    let config = ChunkingConfig::new(size, overlap)?;
    Ok(split_words(text, &config))
}

/// Chunk one fetched resource, numbering windows from 0.
pub fn chunk_file(file: &FileDescriptor, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    config.validate()?;
    Ok(split_words(content, config)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk { uri: file.uri.clone(), name: file.name.clone(), index, text })
        .collect())
}

fn split_words(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    // A window that reaches the last token ends the walk, so no trailing
    // window is ever a suffix of its predecessor.
    while start < words.len() {
        let end = (start + config.size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end >= words.len() { break; }
        start += config.step();
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(n: usize, size: usize, overlap: usize) -> usize {
        if n == 0 { return 0; }
        let rest = n.saturating_sub(overlap);
        rest.div_ceil(size - overlap).max(1)
    }

    #[test]
    fn sliding_window_scenario() {
        let chunks = chunk_text("a b c d e f", 3, 1).unwrap();
        assert_eq!(chunks, vec!["a b c", "c d e", "e f"]);
    }

    #[test]
    fn empty_and_whitespace_text_yield_nothing() {
        assert!(chunk_text("", 3, 1).unwrap().is_empty());
        assert!(chunk_text("  \n\t ", 3, 1).unwrap().is_empty());
    }

    #[test]
    fn overlap_not_smaller_than_size_is_rejected() {
        for (size, overlap) in [(1, 1), (3, 3), (3, 7), (10, 10)] {
            let err = chunk_text("a b c", size, overlap).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration(_)), "size={size} overlap={overlap}");
        }
        assert!(matches!(chunk_text("a b c", 0, 0), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn window_count_and_boundaries() {
        for n in 0..40usize {
            let words: Vec<String> = (0..n).map(|i| format!("w{i}")).collect();
            let text = words.join("  \n");
            for size in 1..8usize {
                for overlap in 0..size {
                    let chunks = chunk_text(&text, size, overlap).unwrap();
                    assert_eq!(chunks.len(), expected_count(n, size, overlap), "n={n} size={size} overlap={overlap}");
                    let split: Vec<Vec<&str>> = chunks.iter().map(|c| c.split(' ').collect()).collect();
                    for (i, window) in split.iter().enumerate() {
                        if i + 1 < split.len() {
                            assert_eq!(window.len(), size);
                            let next = &split[i + 1];
                            assert_eq!(&window[size - overlap..], &next[..overlap]);
                        } else {
                            assert!(window.len() <= size);
                            assert_eq!(window.last().copied(), words.last().map(String::as_str));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn file_chunks_are_numbered_from_zero() {
        let file = FileDescriptor { uri: "github://o/r/src/app.py".into(), name: "src/app.py".into() };
        let chunks = chunk_file(&file, "one two three four five", &ChunkingConfig::new(2, 0).unwrap()).unwrap();
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(chunks.iter().all(|c| c.uri == file.uri && c.name == file.name));
        assert_eq!(chunks[2].text, "five");
    }
}
