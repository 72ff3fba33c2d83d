//! Core data types for cvrag.
//!
//! This module defines the data structures shared by the chunker,
//! the loading and query pipelines and the provider clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// A single text chunk from a document.
///
/// Offsets count characters (`char`), so `end - start` is the
/// chunk length the chunker bounds. `byte_range` addresses the same
/// span in the source string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequential chunk number within the document, from 0
    pub index: usize,

    /// The actual text content
    pub text: String,

    /// Character offset where the chunk starts
    pub start: usize,

    /// Character offset where the chunk ends (exclusive)
    pub end: usize,

    /// Byte range of the chunk in the source string
    pub byte_range: Range<usize>,
}

impl Chunk {
    /// Length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of characters this chunk shares with `previous`.
    pub fn overlap_with(&self, previous: &Chunk) -> usize {
        previous.end.saturating_sub(self.start).min(self.len())
    }
}

/// A record sent to the vector index for server-side embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Unique identifier, `{document}_chunk_{n}`
    pub id: String,

    /// Raw chunk text (embedded by the index service)
    pub text: String,

    /// Free-form category label, e.g. "cv"
    pub category: String,
}

impl IndexRecord {
    /// Build the record for `chunk` of the document named `document`.
    ///
    /// Record numbers are 1-based so ids read `cv1_chunk_1`, `cv1_chunk_2`...
    pub fn from_chunk(document: &str, chunk: &Chunk, category: &str) -> Self {
        Self {
            id: format!("{}_chunk_{}", document, chunk.index + 1),
            text: chunk.text.clone(),
            category: category.to_string(),
        }
    }
}

/// Similarity search request against one namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-form query text (embedded by the index service)
    pub text: String,

    /// Number of hits to return
    pub top_k: usize,
}

/// A single similarity search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Record identifier
    pub id: String,

    /// Similarity score (higher = more similar)
    pub score: f32,

    /// Category stored with the record
    pub category: String,

    /// Chunk text stored with the record
    pub text: String,
}

/// Index statistics as reported by the index service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total records across all namespaces
    pub total_records: u64,

    /// Record count per namespace
    pub namespaces: BTreeMap<String, u64>,

    /// Embedding dimension, when reported
    pub dimension: Option<u32>,
}

/// Creation parameters for an integrated-embedding index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub cloud: String,
    pub region: String,
    /// Hosted embedding model name
    pub embed_model: String,
    /// Record field the service embeds
    pub text_field: String,
    /// How long to wait for a new index to become ready
    pub ready_timeout_secs: u64,
}

/// Statistics from a loading run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadStats {
    /// Documents chunked and upserted
    pub documents_loaded: usize,

    /// Documents skipped (unreadable or not UTF-8)
    pub documents_skipped: usize,

    /// Total records upserted
    pub chunks_upserted: usize,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Target index name
    pub index: String,

    /// Target namespace
    pub namespace: String,

    /// When the run started
    pub started_at: DateTime<Utc>,
}

/// Role of a chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}
