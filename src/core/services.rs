//! Unified service container for cvrag
//!
//! Provides shared access to the configuration and the hosted
//! service clients.

use crate::core::config::{Config, Credentials};
use crate::core::error::{CvragError, Result};
use crate::core::providers::{ChatModel, GroqClient, IndexCatalog, PineconeCatalog};
use std::sync::Arc;
use std::time::Duration;

/// Unified services container
///
/// A client is only built when its API key is present, so commands
/// that never talk to a service do not need its key.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    catalog: Option<Arc<dyn IndexCatalog>>,
    llm: Option<Arc<dyn ChatModel>>,
}

impl Services {
    /// Create services from configuration and credentials
    pub fn from_config(config: Config, credentials: &Credentials) -> Result<Self> {
        let timeout = Duration::from_secs(config.http.timeout_secs);

        let catalog = match credentials.pinecone_api_key.as_deref() {
            Some(key) => Some(Arc::new(
                PineconeCatalog::new(key.to_string(), &config.pinecone, timeout)?
                    .with_text_field(config.index.text_field.clone()),
            ) as Arc<dyn IndexCatalog>),
            None => None,
        };

        let llm = match credentials.groq_api_key.as_deref() {
            Some(key) => Some(
                Arc::new(GroqClient::new(key.to_string(), &config.llm, timeout)?)
                    as Arc<dyn ChatModel>,
            ),
            None => None,
        };

        Ok(Self {
            config: Arc::new(config),
            catalog,
            llm,
        })
    }

    /// Create services around existing clients
    pub fn with_providers(
        config: Config,
        catalog: Arc<dyn IndexCatalog>,
        llm: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Some(catalog),
            llm: Some(llm),
        }
    }

    /// Index catalog, or a `ConfigError` naming the missing key
    pub fn catalog(&self) -> Result<Arc<dyn IndexCatalog>> {
        self.catalog
            .clone()
            .ok_or_else(|| CvragError::ConfigError("PINECONE_API_KEY is not set".to_string()))
    }

    /// Chat model, or a `ConfigError` naming the missing key
    pub fn llm(&self) -> Result<Arc<dyn ChatModel>> {
        self.llm
            .clone()
            .ok_or_else(|| CvragError::ConfigError("GROQ_API_KEY is not set".to_string()))
    }
}
