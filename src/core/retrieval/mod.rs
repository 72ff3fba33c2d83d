//! Query-side pipeline: similarity search and context assembly.

pub mod context;
pub mod search;

pub use context::{truncate_chars, ContextBuilder, NO_CONTEXT};
pub use search::Retriever;

use crate::core::types::SearchHit;

/// One-line summary of a hit for logs and terminal output
pub fn format_hit(hit: &SearchHit) -> String {
    format!(
        "id: {:<10} | score: {:<5.2} | category: {:<10} | text: {}...",
        hit.id,
        hit.score,
        hit.category,
        truncate_chars(&hit.text, 80)
    )
}
