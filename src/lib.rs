//! cvrag - Retrieval-augmented chat over CVs
//!
//! Loads CV documents into a hosted integrated-embedding index and
//! answers questions about them with a hosted chat model, grounding
//! every answer in retrieved chunks.
//!
//! # Architecture
//!
//! - **core**: Domain logic (front-end agnostic)
//!   - config, error, types, xdg
//!   - indexer (chunking, document walking, loading pipeline)
//!   - retrieval (similarity search, context building)
//!   - chat (chat session, CV agent)
//!   - providers (index and chat service clients)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Deterministic, restartable chunk iteration
//! - Streaming answers from the chat model
//! - Per-question CV selection across indexes

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{ChunkConfigError, CvragError, Result};
pub use core::indexer::{chunk, Chunker};
pub use core::services::Services;
pub use core::types::*;
