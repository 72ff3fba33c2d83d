//! Context block formatting.
//!
//! Retrieved hits are condensed into a short bulleted block that
//! is pasted into the prompt, keeping token use bounded.

use crate::core::config::RetrievalConfig;
use crate::core::types::SearchHit;

/// Placeholder used when no hit carries text
pub const NO_CONTEXT: &str = "(no relevant context)";

/// Builds prompt context from search hits
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    max_snippets: usize,
    snippet_chars: usize,
}

impl ContextBuilder {
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            max_snippets: config.max_snippets,
            snippet_chars: config.snippet_chars,
        }
    }

    /// Hit texts, truncated, at most `max_snippets` of them
    pub fn snippets(&self, hits: &[SearchHit]) -> Vec<String> {
        hits.iter()
            .take(self.max_snippets)
            .filter(|hit| !hit.text.is_empty())
            .map(|hit| truncate_chars(&hit.text, self.snippet_chars).to_string())
            .collect()
    }

    /// Snippets joined as a `- ` bullet list body.
    ///
    /// The first bullet marker is left to the caller's template.
    pub fn build(&self, hits: &[SearchHit]) -> String {
        let snippets = self.snippets(hits);
        if snippets.is_empty() {
            NO_CONTEXT.to_string()
        } else {
            snippets.join("\n- ")
        }
    }
}

/// Longest prefix of `text` with at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
