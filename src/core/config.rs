//! Configuration management for cvrag.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! API keys are never read from the file; see [`Credentials`].

use crate::core::error::{CvragError, Result};
use crate::core::indexer::Chunker;
use crate::core::types::IndexSpec;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pinecone: PineconeConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

/// Vector index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_name")]
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Category stored with every record
    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default = "default_cloud")]
    pub cloud: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Hosted embedding model used when creating the index
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Record field the index embeds
    #[serde(default = "default_text_field")]
    pub text_field: String,

    /// Seconds to wait for a freshly created index
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
}

/// Document loading configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadingConfig {
    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum document size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Records per upsert request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seconds to wait after loading so records become searchable
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,
}

/// Retrieval configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Hits retrieved to ground each answer
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Upper bound for any requested top_k
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Maximum query length in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Snippets included in a context block
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,

    /// Characters kept per snippet
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Hits per index when the agent picks a CV
    #[serde(default = "default_top_k")]
    pub selector_top_k: usize,

    /// Pause between per-index searches (rate limiting)
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
}

/// Chat model configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API root
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default)]
    pub stop: Option<String>,

    /// Sampling temperature for agent answers
    #[serde(default = "default_agent_temperature")]
    pub agent_temperature: f32,
}

/// Index service endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PineconeConfig {
    /// Control plane root
    #[serde(default = "default_controller_url")]
    pub controller_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_index_name() -> String {
    "cv-index".to_string()
}

fn default_namespace() -> String {
    "cv-namespace".to_string()
}

fn default_category() -> String {
    "cv".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_embed_model() -> String {
    "llama-text-embed-v2".to_string()
}

fn default_text_field() -> String {
    "chunk_text".to_string()
}

fn default_ready_timeout() -> u64 {
    60
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.txt".to_string(), "*.md".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/.git/**".to_string(), "**/target/**".to_string()]
}

fn default_max_file_size() -> usize {
    10
}

fn default_batch_size() -> usize {
    50
}

fn default_settle_secs() -> u64 {
    5
}

fn default_top_k() -> usize {
    3
}

fn default_max_top_k() -> usize {
    100
}

fn default_max_query_length() -> usize {
    2000
}

fn default_max_snippets() -> usize {
    5
}

fn default_snippet_chars() -> usize {
    300
}

fn default_search_delay_ms() -> u64 {
    500
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_max_completion_tokens() -> u32 {
    1024
}

fn default_top_p() -> f32 {
    1.0
}

fn default_agent_temperature() -> f32 {
    0.7
}

fn default_controller_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_api_version() -> String {
    "2025-04".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            namespace: default_namespace(),
            category: default_category(),
            cloud: default_cloud(),
            region: default_region(),
            embed_model: default_embed_model(),
            text_field: default_text_field(),
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size_mb: default_max_file_size(),
            batch_size: default_batch_size(),
            settle_secs: default_settle_secs(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            max_query_length: default_max_query_length(),
            max_snippets: default_max_snippets(),
            snippet_chars: default_snippet_chars(),
            selector_top_k: default_top_k(),
            search_delay_ms: default_search_delay_ms(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_completion_tokens: default_max_completion_tokens(),
            top_p: default_top_p(),
            stop: None,
            agent_temperature: default_agent_temperature(),
        }
    }
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            controller_url: default_controller_url(),
            api_version: default_api_version(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_request_timeout(),
        }
    }
}

impl IndexConfig {
    /// Creation parameters for this index
    pub fn spec(&self) -> IndexSpec {
        IndexSpec {
            name: self.name.clone(),
            cloud: self.cloud.clone(),
            region: self.region.clone(),
            embed_model: self.embed_model.clone(),
            text_field: self.text_field.clone(),
            ready_timeout_secs: self.ready_timeout_secs,
        }
    }
}

/// Parse an env var into `target`, ignoring unparsable values
fn override_from_env<T: std::str::FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = env::var(name) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring unparsable {}={:?}", name, raw),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CvragError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority order:
    /// 1. CVRAG_CONFIG env var
    /// 2. XDG config file (~/.config/cvrag/config.toml)
    /// 3. ./cvrag.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        xdg.log_paths();

        let mut config = if let Ok(config_path) = env::var("CVRAG_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("cvrag.toml").exists() {
                Self::from_file("cvrag.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        override_from_env("CVRAG_CHUNK_SIZE", &mut self.chunking.chunk_size);
        override_from_env("CVRAG_OVERLAP", &mut self.chunking.overlap);

        override_from_env("CVRAG_INDEX", &mut self.index.name);
        override_from_env("CVRAG_NAMESPACE", &mut self.index.namespace);
        override_from_env("CVRAG_CATEGORY", &mut self.index.category);

        override_from_env("CVRAG_BATCH_SIZE", &mut self.loading.batch_size);
        override_from_env("CVRAG_SETTLE_SECS", &mut self.loading.settle_secs);
        override_from_env("CVRAG_MAX_FILE_SIZE_MB", &mut self.loading.max_file_size_mb);

        override_from_env("CVRAG_TOP_K", &mut self.retrieval.top_k);
        override_from_env("CVRAG_MAX_TOP_K", &mut self.retrieval.max_top_k);

        override_from_env("CVRAG_LLM_BASE_URL", &mut self.llm.base_url);
        override_from_env("CVRAG_MODEL", &mut self.llm.model);
        override_from_env("CVRAG_TEMPERATURE", &mut self.llm.temperature);

        override_from_env("CVRAG_PINECONE_URL", &mut self.pinecone.controller_url);
        override_from_env("CVRAG_REQUEST_TIMEOUT_SEC", &mut self.http.timeout_secs);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Chunker::new(self.chunking.chunk_size, self.chunking.overlap)?;

        for (name, value) in [
            ("Index name", &self.index.name),
            ("Namespace", &self.index.namespace),
            ("Text field", &self.index.text_field),
            ("Model", &self.llm.model),
        ] {
            if value.trim().is_empty() {
                return Err(CvragError::ConfigError(format!("{name} must not be empty")));
            }
        }

        if self.loading.batch_size == 0 {
            return Err(CvragError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 || self.retrieval.selector_top_k == 0 {
            return Err(CvragError::ConfigError(
                "top_k must be non-zero".to_string(),
            ));
        }

        if self.retrieval.top_k > self.retrieval.max_top_k {
            return Err(CvragError::ConfigError(
                "top_k cannot exceed max_top_k".to_string(),
            ));
        }

        if self.retrieval.snippet_chars == 0 || self.retrieval.max_query_length == 0 {
            return Err(CvragError::ConfigError(
                "Snippet and query lengths must be non-zero".to_string(),
            ));
        }

        for temperature in [self.llm.temperature, self.llm.agent_temperature] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(CvragError::ConfigError(format!(
                    "Temperature {temperature} is outside 0.0-2.0"
                )));
            }
        }

        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(CvragError::ConfigError(format!(
                "top_p {} is outside (0.0, 1.0]",
                self.llm.top_p
            )));
        }

        if self.http.timeout_secs == 0 {
            return Err(CvragError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.chunking.chunk_size);
        tracing::info!("  Overlap: {} chars", self.chunking.overlap);
        tracing::info!("  Index: {} / {}", self.index.name, self.index.namespace);
        tracing::info!("  Embed model: {}", self.index.embed_model);
        tracing::info!("  Batch size: {}", self.loading.batch_size);
        tracing::info!("  Top k: {}", self.retrieval.top_k);
        tracing::info!("  Model: {}", self.llm.model);
        tracing::info!("  LLM endpoint: {}", self.llm.base_url);
        tracing::info!("  Request timeout: {}s", self.http.timeout_secs);
    }
}

/// API keys for the hosted services, read from the environment only.
#[derive(Clone, Default)]
pub struct Credentials {
    pub pinecone_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

impl Credentials {
    /// Read `PINECONE_API_KEY` and `GROQ_API_KEY`
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            pinecone_api_key: read("PINECONE_API_KEY"),
            groq_api_key: read("GROQ_API_KEY"),
        }
    }

    pub fn pinecone(&self) -> Result<&str> {
        self.pinecone_api_key
            .as_deref()
            .ok_or_else(|| CvragError::ConfigError("PINECONE_API_KEY is not set".to_string()))
    }

    pub fn groq(&self) -> Result<&str> {
        self.groq_api_key
            .as_deref()
            .ok_or_else(|| CvragError::ConfigError("GROQ_API_KEY is not set".to_string()))
    }
}

/// Show at most the first 6 characters of a secret
pub fn redact(secret: Option<&str>) -> String {
    match secret {
        Some(s) => format!("{}...", s.chars().take(6).collect::<String>()),
        None => "(not set)".to_string(),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("pinecone_api_key", &redact(self.pinecone_api_key.as_deref()))
            .field("groq_api_key", &redact(self.groq_api_key.as_deref()))
            .finish()
    }
}
