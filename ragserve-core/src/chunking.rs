//! Fixed-size document chunking.
//!
//! Splits document text into overlapping segments measured in characters.
//! Chunking is deterministic and lossless: stripping the overlapping prefix
//! from every chunk after the first and concatenating the remainder
//! reconstructs the original text.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings; embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text. Each chunk
    /// inherits the document's metadata plus a `chunk_index` field.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into fixed-size chunks by character count with overlap.
///
/// The cursor advances by `chunk_size - overlap` characters per chunk, so
/// consecutive chunks share an `overlap`-character prefix/suffix. The final
/// chunk may be shorter than `chunk_size`. Offsets are computed on character
/// boundaries, never mid-codepoint.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `overlap >= chunk_size`; a non-advancing cursor would loop forever.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        // Byte offsets of every character boundary, with the text length
        // appended so `bounds[i]..bounds[j]` spans chars i..j.
        let mut bounds: Vec<usize> = document.text.char_indices().map(|(i, _)| i).collect();
        bounds.push(document.text.len());
        let total_chars = bounds.len() - 1;

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(total_chars);
            let text = document.text[bounds[start]..bounds[end]].to_string();

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), chunks.len().to_string());
            chunks.push(Chunk { text, metadata });

            if end == total_chars {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document::new(text, HashMap::from([("source".to_string(), "test".to_string())]))
    }

    #[test]
    fn rejects_overlap_not_less_than_chunk_size() {
        assert!(FixedSizeChunker::new(10, 10).is_err());
        assert!(FixedSizeChunker::new(10, 20).is_err());
        assert!(FixedSizeChunker::new(0, 0).is_err());
        assert!(FixedSizeChunker::new(10, 9).is_ok());
    }

    #[test]
    fn single_chunk_when_text_fits() {
        let chunker = FixedSizeChunker::new(100, 20).unwrap();
        let chunks = chunker.chunk(&doc("short text"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].metadata["chunk_index"], "0");
        assert_eq!(chunks[0].metadata["source"], "test");
    }

    #[test]
    fn overlapping_split_covers_whole_text() {
        let chunker = FixedSizeChunker::new(5, 2).unwrap();
        let chunks = chunker.chunk(&doc("abcdefghij"));
        assert_eq!(chunks[0].text, "abcde");
        assert_eq!(chunks[1].text, "defgh");
        assert_eq!(chunks[2].text, "ghij");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = FixedSizeChunker::new(5, 1).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn splits_on_character_boundaries() {
        let chunker = FixedSizeChunker::new(4, 1).unwrap();
        let text = "héllo wörld ünïcode";
        let chunks = chunker.chunk(&doc(text));
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 4);
        }
        // Overlap-stripped concatenation reconstructs the source.
        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(&chunk.text);
            } else {
                rebuilt.extend(chunk.text.chars().skip(1));
            }
        }
        assert_eq!(rebuilt, text);
    }
}
