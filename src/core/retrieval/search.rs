//! Similarity search against a namespace.

use crate::core::config::RetrievalConfig;
use crate::core::error::{CvragError, Result};
use crate::core::providers::VectorIndex;
use crate::core::types::{SearchHit, SearchQuery};

/// Validates queries and runs them against an index
#[derive(Debug, Clone)]
pub struct Retriever {
    max_top_k: usize,
    max_query_length: usize,
}

impl Retriever {
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            max_top_k: config.max_top_k,
            max_query_length: config.max_query_length,
        }
    }

    /// Validate `text` and clamp `top_k` to the configured maximum.
    pub fn build_query(&self, text: &str, top_k: usize) -> Result<SearchQuery> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CvragError::InvalidQuery("query is empty".to_string()));
        }

        let length = text.chars().count();
        if length > self.max_query_length {
            return Err(CvragError::InvalidQuery(format!(
                "query is {length} characters, maximum is {}",
                self.max_query_length
            )));
        }

        if top_k == 0 {
            return Err(CvragError::InvalidQuery(
                "top_k must be at least 1".to_string(),
            ));
        }

        Ok(SearchQuery {
            text: text.to_string(),
            top_k: top_k.min(self.max_top_k),
        })
    }

    /// Retrieve the `top_k` records most similar to `text`.
    ///
    /// Index statistics are logged at debug level first; a failure
    /// to fetch them does not fail the search.
    pub async fn search_similar(
        &self,
        index: &dyn VectorIndex,
        namespace: &str,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let query = self.build_query(text, top_k)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            match index.describe().await {
                Ok(stats) => tracing::debug!("Index {} stats: {:?}", index.name(), stats),
                Err(e) => tracing::debug!("Could not describe index {}: {}", index.name(), e),
            }
        }

        let hits = index.search(namespace, &query).await?;
        tracing::debug!(
            "Search in {}/{} returned {} hits",
            index.name(),
            namespace,
            hits.len()
        );
        for hit in &hits {
            tracing::debug!("{}", super::format_hit(hit));
        }

        Ok(hits)
    }
}
