//! External service seams.
//!
//! Embedding, similarity search and text generation all happen in
//! hosted services. This module defines the traits the pipelines
//! talk to, plus their implementations:
//!
//! - [`pinecone`]: integrated-embedding vector index over HTTP
//! - [`groq`]: OpenAI-compatible chat completions with SSE streaming
//! - [`memory`]: in-process doubles for tests

pub mod groq;
pub mod memory;
pub mod pinecone;
pub mod sse;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::error::{CvragError, Result};
use crate::core::types::{ChatRequest, IndexRecord, IndexSpec, IndexStats, SearchHit, SearchQuery};

pub use groq::GroqClient;
pub use memory::{MemoryCatalog, MemoryIndex, ScriptedChatModel};
pub use pinecone::{PineconeCatalog, PineconeIndex};

/// Stream of generated text deltas
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Index management (control plane)
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// Names of all indexes visible to the caller
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Open `spec.name`, creating it first if it does not exist
    async fn ensure_index(&self, spec: &IndexSpec) -> Result<Arc<dyn VectorIndex>>;

    /// Open an existing index
    async fn open_index(&self, name: &str) -> Result<Arc<dyn VectorIndex>>;
}

/// Record storage and similarity search on one index (data plane)
#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Insert or replace records in `namespace`
    async fn upsert(&self, namespace: &str, records: &[IndexRecord]) -> Result<()>;

    /// Return the hits most similar to `query`, best first
    async fn search(&self, namespace: &str, query: &SearchQuery) -> Result<Vec<SearchHit>>;

    async fn describe(&self) -> Result<IndexStats>;
}

/// Chat completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a full reply
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Generate a reply as a stream of text deltas
    async fn stream(&self, request: &ChatRequest) -> Result<TokenStream>;
}

/// Map non-success HTTP statuses onto error variants
pub(crate) async fn check_status(
    response: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        401 | 403 => CvragError::Auth {
            service: service.to_string(),
        },
        429 => CvragError::RateLimited {
            service: service.to_string(),
        },
        _ => CvragError::Api { status, body },
    })
}
