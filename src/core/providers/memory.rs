//! In-process service doubles.
//!
//! These stand in for the hosted index and chat services in tests
//! and offline runs. [`MemoryIndex`] is not a search engine: it
//! scores a record by the fraction of query words it contains, which
//! is enough to make fixture retrieval deterministic.

use async_trait::async_trait;
use futures::stream;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::core::error::{CvragError, Result};
use crate::core::providers::{ChatModel, IndexCatalog, TokenStream, VectorIndex};
use crate::core::types::{
    ChatRequest, IndexRecord, IndexSpec, IndexStats, SearchHit, SearchQuery,
};

/// Catalog of in-memory indexes
#[derive(Default)]
pub struct MemoryCatalog {
    indexes: RwLock<BTreeMap<String, Arc<MemoryIndex>>>,
    created: Mutex<Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index up front
    pub async fn insert(&self, index: MemoryIndex) -> Arc<MemoryIndex> {
        let index = Arc::new(index);
        self.indexes
            .write()
            .await
            .insert(index.name.clone(), Arc::clone(&index));
        index
    }

    /// Concrete handle to an index, for assertions
    pub async fn get(&self, name: &str) -> Option<Arc<MemoryIndex>> {
        self.indexes.read().await.get(name).cloned()
    }

    /// Names passed to `ensure_index` that caused a creation
    pub async fn created(&self) -> Vec<String> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl IndexCatalog for MemoryCatalog {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        Ok(self.indexes.read().await.keys().cloned().collect())
    }

    async fn ensure_index(&self, spec: &IndexSpec) -> Result<Arc<dyn VectorIndex>> {
        let mut indexes = self.indexes.write().await;
        let index = match indexes.get(&spec.name) {
            Some(index) => Arc::clone(index),
            None => {
                self.created.lock().await.push(spec.name.clone());
                let index = Arc::new(MemoryIndex::new(&spec.name));
                indexes.insert(spec.name.clone(), Arc::clone(&index));
                index
            }
        };
        Ok(index as Arc<dyn VectorIndex>)
    }

    async fn open_index(&self, name: &str) -> Result<Arc<dyn VectorIndex>> {
        match self.indexes.read().await.get(name) {
            Some(index) => Ok(Arc::clone(index) as Arc<dyn VectorIndex>),
            None => Err(CvragError::IndexNotFound(name.to_string())),
        }
    }
}

/// In-memory index keyed by namespace then record id
pub struct MemoryIndex {
    name: String,
    namespaces: RwLock<HashMap<String, BTreeMap<String, IndexRecord>>>,
    upsert_calls: Mutex<usize>,
}

impl MemoryIndex {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespaces: RwLock::new(HashMap::new()),
            upsert_calls: Mutex::new(0),
        }
    }

    /// Build an index pre-filled with `(id, text)` records
    pub async fn with_records(name: &str, namespace: &str, records: &[(&str, &str)]) -> Self {
        let index = Self::new(name);
        let records: Vec<IndexRecord> = records
            .iter()
            .map(|(id, text)| IndexRecord {
                id: id.to_string(),
                text: text.to_string(),
                category: "cv".to_string(),
            })
            .collect();
        {
            let mut namespaces = index.namespaces.write().await;
            let ns = namespaces.entry(namespace.to_string()).or_default();
            for record in records {
                ns.insert(record.id.clone(), record);
            }
        }
        index
    }

    /// All records in `namespace`, ordered by id
    pub async fn records(&self, namespace: &str) -> Vec<IndexRecord> {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .map(|ns| ns.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of upsert requests received
    pub async fn upsert_calls(&self) -> usize {
        *self.upsert_calls.lock().await
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn overlap_score(query_words: &[String], text: &str) -> f32 {
    if query_words.is_empty() {
        return 0.0;
    }
    let text_words = words(text);
    let found = query_words
        .iter()
        .filter(|w| text_words.contains(w))
        .count();
    found as f32 / query_words.len() as f32
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, namespace: &str, records: &[IndexRecord]) -> Result<()> {
        *self.upsert_calls.lock().await += 1;
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            ns.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn search(&self, namespace: &str, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let query_words = words(&query.text);
        let namespaces = self.namespaces.read().await;
        let Some(ns) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SearchHit> = ns
            .values()
            .map(|record| SearchHit {
                id: record.id.clone(),
                score: overlap_score(&query_words, &record.text),
                category: record.category.clone(),
                text: record.text.clone(),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        // Stable sort keeps id order among equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(query.top_k);
        Ok(hits)
    }

    async fn describe(&self) -> Result<IndexStats> {
        let namespaces: BTreeMap<String, u64> = self
            .namespaces
            .read()
            .await
            .iter()
            .map(|(name, ns)| (name.clone(), ns.len() as u64))
            .collect();

        Ok(IndexStats {
            total_records: namespaces.values().sum(),
            namespaces,
            dimension: None,
        })
    }
}

/// Chat model that replays canned replies in order
#[derive(Default)]
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue another reply
    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(reply.into()));
    }

    /// Queue a failure
    pub async fn push_error(&self, error: CvragError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Every request received so far
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().await.push(request.clone());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CvragError::Parse("no scripted reply left".to_string())))
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.next_reply(request).await
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TokenStream> {
        let reply = self.next_reply(request).await?;

        // Deliver word by word, keeping the separating spaces
        let mut deltas = Vec::new();
        let mut current = String::new();
        for c in reply.chars() {
            current.push(c);
            if c == ' ' {
                deltas.push(Ok(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            deltas.push(Ok(current));
        }

        Ok(Box::pin(stream::iter(deltas)))
    }
}
