//! Document chunking and loading.
//!
//! Key pieces:
//!
//! - UTF-8 safe character-based chunking with overlap
//! - Document discovery with glob include/exclude patterns
//! - The loading pipeline that feeds chunks to an index
//!
//! # Safety
//!
//! The chunker slices on character boundaries taken from
//! `char_indices()`, so multi-byte text (accents, CJK, emoji)
//! never causes a panic.

pub mod chunker;
pub mod pipeline;
pub mod walker;

pub use chunker::{chunk, Chunker, Chunks};
pub use pipeline::LoadingPipeline;
pub use walker::DocumentWalker;
