//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::{redact, Config, Credentials};
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show loading, retrieval and HTTP settings
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config: Config,
    pub credentials: RedactedCredentials,
}

#[derive(Debug, Serialize)]
pub struct RedactedCredentials {
    pub pinecone_api_key: String,
    pub groq_api_key: String,
}

/// Assemble the effective configuration with secrets redacted
pub fn build_response(config: &Config, credentials: &Credentials) -> ConfigResponse {
    ConfigResponse {
        config_file: XdgDirs::new().config_file().to_string_lossy().into_owned(),
        config: config.clone(),
        credentials: RedactedCredentials {
            pinecone_api_key: redact(credentials.pinecone_api_key.as_deref()),
            groq_api_key: redact(credentials.groq_api_key.as_deref()),
        },
    }
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = build_response(&services.config, credentials);
    let config = &response.config;

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!("  config_file: {}", colors::file_path(&response.config_file));
            println!("  chunking:");
            println!("    chunk_size: {}", config.chunking.chunk_size);
            println!("    overlap: {}", config.chunking.overlap);
            println!("  index:");
            println!("    name: {}", colors::index_name(&config.index.name));
            println!("    namespace: {}", colors::index_name(&config.index.namespace));
            println!("    category: {}", config.index.category);
            println!("    embed_model: {}", config.index.embed_model);
            println!("  llm:");
            println!("    base_url: {}", config.llm.base_url);
            println!("    model: {}", config.llm.model);
            println!("    temperature: {}", config.llm.temperature);
            println!("    max_completion_tokens: {}", config.llm.max_completion_tokens);

            if args.all {
                println!("  loading:");
                println!("    include_patterns: {:?}", config.loading.include_patterns);
                println!("    exclude_patterns: {:?}", config.loading.exclude_patterns);
                println!("    max_file_size_mb: {}", config.loading.max_file_size_mb);
                println!("    batch_size: {}", config.loading.batch_size);
                println!("    settle_secs: {}", config.loading.settle_secs);
                println!("  retrieval:");
                println!("    top_k: {}", config.retrieval.top_k);
                println!("    max_top_k: {}", config.retrieval.max_top_k);
                println!("    max_snippets: {}", config.retrieval.max_snippets);
                println!("    snippet_chars: {}", config.retrieval.snippet_chars);
                println!("  pinecone:");
                println!("    controller_url: {}", config.pinecone.controller_url);
                println!("    api_version: {}", config.pinecone.api_version);
                println!("  http:");
                println!("    timeout_secs: {}", config.http.timeout_secs);
            }

            println!("  credentials:");
            println!(
                "    PINECONE_API_KEY: {}",
                colors::dim(&response.credentials.pinecone_api_key)
            );
            println!(
                "    GROQ_API_KEY: {}",
                colors::dim(&response.credentials.groq_api_key)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
