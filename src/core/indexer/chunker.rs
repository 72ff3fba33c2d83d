//! UTF-8 safe text chunking.
//!
//! Implements character-based chunking that never splits a
//! multi-byte UTF-8 sequence. Sizes, overlaps and offsets are all
//! measured in `char`s, and chunk boundaries are resolved through
//! `char_indices()`, so every chunk is a valid `&str` slice of the
//! source text.
//!
//! # Example
//!
//! ```
//! use cvrag::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(4, 2).unwrap();
//! let texts: Vec<String> = chunker
//!     .chunks("abcdefghij")
//!     .map(|chunk| chunk.text)
//!     .collect();
//!
//! assert_eq!(texts, ["abcd", "cdef", "efgh", "ghij", "ij"]);
//! ```

use crate::core::error::ChunkConfigError;
use crate::core::types::Chunk;

/// Split `text` into overlapping chunks of at most `size` characters.
///
/// The configuration is validated before any work is done. Empty
/// text yields no chunks.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<Chunk>, ChunkConfigError> {
    Ok(Chunker::new(size, overlap)?.chunk_text(text))
}

/// Validated fixed-size chunker.
///
/// Splits text into fixed-size chunks with configurable overlap.
/// All sizes are measured in **characters**, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    /// Number of characters per chunk
    chunk_size: usize,

    /// Number of characters to overlap between consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkConfigError::ZeroSize`] if `chunk_size` is 0
    /// and [`ChunkConfigError::OverlapTooLarge`] if
    /// `overlap >= chunk_size`.
    ///
    /// # Example
    ///
    /// ```
    /// use cvrag::core::indexer::Chunker;
    ///
    /// let chunker = Chunker::new(500, 50).unwrap();
    /// assert_eq!(chunker.stride(), 450);
    /// assert!(Chunker::new(1, 1).is_err());
    /// ```
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkConfigError> {
        if chunk_size == 0 {
            return Err(ChunkConfigError::ZeroSize);
        }
        if overlap >= chunk_size {
            return Err(ChunkConfigError::OverlapTooLarge {
                overlap,
                size: chunk_size,
            });
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive chunks. Always > 0.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Number of chunks `chunks(text)` yields for a text of
    /// `char_count` characters.
    pub fn chunk_count(&self, char_count: usize) -> usize {
        char_count.div_ceil(self.stride())
    }

    /// Lazily chunk `text`.
    ///
    /// The iterator borrows `text`; calling this again with the
    /// same input yields an identical sequence.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            char_indices: text.char_indices().map(|(offset, _)| offset).collect(),
            chunk_size: self.chunk_size,
            stride: self.stride(),
            next_index: 0,
        }
    }

    /// Chunk `text` into a vector.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        self.chunks(text).collect()
    }
}

/// Iterator over the chunks of one text. See [`Chunker::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset of every character in `text`
    char_indices: Vec<usize>,
    chunk_size: usize,
    stride: usize,
    next_index: usize,
}

impl Chunks<'_> {
    fn byte_offset(&self, char_offset: usize) -> usize {
        self.char_indices
            .get(char_offset)
            .copied()
            .unwrap_or(self.text.len())
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let char_count = self.char_indices.len();
        let start = self.next_index.checked_mul(self.stride)?;
        if start >= char_count {
            return None;
        }

        let end = start.saturating_add(self.chunk_size).min(char_count);
        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);

        let chunk = Chunk {
            index: self.next_index,
            text: self.text[byte_start..byte_end].to_string(),
            start,
            end,
            byte_range: byte_start..byte_end,
        };
        self.next_index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.char_indices.len().div_ceil(self.stride);
        let remaining = total.saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl std::iter::FusedIterator for Chunks<'_> {}
