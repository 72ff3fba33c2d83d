//! Core domain logic (front-end agnostic)
//!
//! This module contains all logic that is independent of the
//! command-line front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **indexer**: Chunking, document walking and the loading pipeline
//! - **retrieval**: Similarity search and prompt context
//! - **chat**: Chat session and CV agent
//! - **providers**: Index and chat service clients
//! - **services**: Unified service container

pub mod chat;
pub mod config;
pub mod error;
pub mod indexer;
pub mod providers;
pub mod retrieval;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{CvragError, Result};
pub use services::Services;
