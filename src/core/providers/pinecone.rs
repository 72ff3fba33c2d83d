//! Pinecone integrated-embedding index client.
//!
//! The control plane (`controller_url`) lists, describes and creates
//! indexes. Each index has its own data-plane host that stores
//! records and runs searches; the service embeds the configured
//! text field itself, so records and queries travel as plain text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::core::config::PineconeConfig;
use crate::core::error::{CvragError, Result};
use crate::core::providers::{check_status, IndexCatalog, VectorIndex};
use crate::core::types::{IndexRecord, IndexSpec, IndexStats, SearchHit, SearchQuery};

const SERVICE: &str = "pinecone";

/// How often to poll a new index for readiness
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Record field holding chunk text unless configured otherwise
const DEFAULT_TEXT_FIELD: &str = "chunk_text";

/// Shared HTTP plumbing for both planes
#[derive(Clone)]
struct Transport {
    client: reqwest::Client,
    api_key: String,
    api_version: String,
}

impl Transport {
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
    }

    async fn json(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let response = check_status(builder.send().await?, SERVICE).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| CvragError::Parse(format!("pinecone response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

/// Control-plane client
#[derive(Clone)]
pub struct PineconeCatalog {
    transport: Transport,
    controller_url: String,
    text_field: String,
}

impl PineconeCatalog {
    pub fn new(api_key: String, config: &PineconeConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            transport: Transport {
                client,
                api_key,
                api_version: config.api_version.clone(),
            },
            controller_url: config.controller_url.trim_end_matches('/').to_string(),
            text_field: DEFAULT_TEXT_FIELD.to_string(),
        })
    }

    /// Read and write chunk text under `field` for indexes opened by name.
    ///
    /// Indexes returned by `ensure_index` use the field of their spec.
    pub fn with_text_field(mut self, field: impl Into<String>) -> Self {
        self.text_field = field.into();
        self
    }

    async fn describe_index(&self, name: &str) -> Result<IndexModel> {
        let url = format!("{}/indexes/{}", self.controller_url, name);
        let builder = self.transport.request(reqwest::Method::GET, &url);

        match self.transport.json(builder).await {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| CvragError::Parse(format!("index description: {e}"))),
            Err(CvragError::Api { status: 404, .. }) => {
                Err(CvragError::IndexNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<()> {
        let url = format!("{}/indexes/create-for-model", self.controller_url);
        let body = json!({
            "name": spec.name,
            "cloud": spec.cloud,
            "region": spec.region,
            "embed": {
                "model": spec.embed_model,
                "field_map": { "text": spec.text_field },
            },
        });

        let builder = self.transport.request(reqwest::Method::POST, &url).json(&body);
        self.transport.json(builder).await?;
        Ok(())
    }

    /// Poll until the index reports ready or the timeout passes
    async fn wait_until_ready(&self, spec: &IndexSpec) -> Result<IndexModel> {
        let started = Instant::now();
        let timeout = Duration::from_secs(spec.ready_timeout_secs);

        loop {
            let model = self.describe_index(&spec.name).await?;
            if model.status.ready && !model.host.is_empty() {
                return Ok(model);
            }
            debug!(
                "Index {} not ready yet (state: {})",
                spec.name, model.status.state
            );

            if started.elapsed() >= timeout {
                return Err(CvragError::IndexNotReady {
                    name: spec.name.clone(),
                    waited_secs: spec.ready_timeout_secs,
                });
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    fn index_handle(&self, model: IndexModel, text_field: &str) -> Arc<dyn VectorIndex> {
        Arc::new(PineconeIndex::new(
            self.transport.clone(),
            model.name,
            &model.host,
            text_field,
        ))
    }
}

#[async_trait]
impl IndexCatalog for PineconeCatalog {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let url = format!("{}/indexes", self.controller_url);
        let builder = self.transport.request(reqwest::Method::GET, &url);
        let list: IndexList = serde_json::from_value(self.transport.json(builder).await?)
            .map_err(|e| CvragError::Parse(format!("index list: {e}")))?;

        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    async fn ensure_index(&self, spec: &IndexSpec) -> Result<Arc<dyn VectorIndex>> {
        let existing = self.list_indexes().await?;
        if existing.iter().any(|name| name == &spec.name) {
            info!("Index {} already exists", spec.name);
        } else {
            info!("Index {} not found, creating it", spec.name);
            self.create_index(spec).await?;
        }

        let model = self.wait_until_ready(spec).await?;
        info!("Index {} ready at {}", model.name, model.host);
        Ok(self.index_handle(model, &spec.text_field))
    }

    async fn open_index(&self, name: &str) -> Result<Arc<dyn VectorIndex>> {
        let model = self.describe_index(name).await?;
        if model.host.is_empty() {
            return Err(CvragError::IndexNotReady {
                name: name.to_string(),
                waited_secs: 0,
            });
        }
        Ok(self.index_handle(model, &self.text_field))
    }
}

/// Data-plane client for one index
pub struct PineconeIndex {
    transport: Transport,
    name: String,
    base_url: String,
    text_field: String,
}

impl PineconeIndex {
    fn new(transport: Transport, name: String, host: &str, text_field: &str) -> Self {
        Self {
            transport,
            name,
            base_url: host_url(host),
            text_field: text_field.to_string(),
        }
    }
}

/// Index hosts come back without a scheme
fn host_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Upsert bodies are newline-delimited JSON, one record per line
fn ndjson(records: &[IndexRecord], text_field: &str) -> Result<String> {
    let mut body = String::new();
    for record in records {
        let mut line = json!({
            "_id": record.id,
            "category": record.category,
        });
        line[text_field] = Value::String(record.text.clone());
        body.push_str(&serde_json::to_string(&line)?);
        body.push('\n');
    }
    Ok(body)
}

fn parse_hits(response: &Value, text_field: &str) -> Result<Vec<SearchHit>> {
    let hits = response["result"]["hits"]
        .as_array()
        .ok_or_else(|| CvragError::Parse("missing result.hits".to_string()))?;

    Ok(hits
        .iter()
        .map(|hit| {
            let field = |name: &str| hit["fields"][name].as_str().unwrap_or_default().to_string();
            SearchHit {
                id: hit["_id"].as_str().unwrap_or_default().to_string(),
                score: hit["_score"].as_f64().unwrap_or(0.0) as f32,
                category: field("category"),
                text: field(text_field),
            }
        })
        .collect())
}

fn parse_stats(response: &Value) -> IndexStats {
    let namespaces: BTreeMap<String, u64> = response["namespaces"]
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, ns)| (name.clone(), ns["vectorCount"].as_u64().unwrap_or(0)))
                .collect()
        })
        .unwrap_or_default();

    IndexStats {
        total_records: response["totalVectorCount"]
            .as_u64()
            .unwrap_or_else(|| namespaces.values().sum()),
        namespaces,
        dimension: response["dimension"].as_u64().map(|d| d as u32),
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, namespace: &str, records: &[IndexRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = format!("{}/records/namespaces/{}/upsert", self.base_url, namespace);
        let builder = self
            .transport
            .request(reqwest::Method::POST, &url)
            .header("Content-Type", "application/x-ndjson")
            .body(ndjson(records, &self.text_field)?);

        self.transport.json(builder).await?;
        Ok(())
    }

    async fn search(&self, namespace: &str, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let url = format!("{}/records/namespaces/{}/search", self.base_url, namespace);
        let body = json!({
            "query": {
                "top_k": query.top_k,
                "inputs": { "text": query.text },
            },
            "fields": ["category", self.text_field],
        });

        let builder = self.transport.request(reqwest::Method::POST, &url).json(&body);
        parse_hits(&self.transport.json(builder).await?, &self.text_field)
    }

    async fn describe(&self) -> Result<IndexStats> {
        let url = format!("{}/describe_index_stats", self.base_url);
        let builder = self
            .transport
            .request(reqwest::Method::POST, &url)
            .json(&json!({}));

        Ok(parse_stats(&self.transport.json(builder).await?))
    }
}
