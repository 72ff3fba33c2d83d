//! Load command - chunk documents and upsert them into the index

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::indexer::LoadingPipeline;
use crate::core::services::Services;
use crate::core::types::LoadStats;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// File or directory of documents
    pub path: PathBuf,

    /// Target index
    #[arg(long)]
    pub index: Option<String>,

    /// Target namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Category stored with each record
    #[arg(long)]
    pub category: Option<String>,

    /// Characters per chunk
    #[arg(long)]
    pub size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Do not wait for records to become searchable
    #[arg(long)]
    pub no_settle: bool,
}

impl LoadArgs {
    /// Configuration with command-line overrides applied
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(index) = &self.index {
            config.index.name = index.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.index.namespace = namespace.clone();
        }
        if let Some(category) = &self.category {
            config.index.category = category.clone();
        }
        if let Some(size) = self.size {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.overlap {
            config.chunking.overlap = overlap;
        }
        if self.no_settle {
            config.loading.settle_secs = 0;
        }
        config
    }
}

/// Run the loading pipeline with the effective settings
pub async fn load(args: &LoadArgs, services: &Services) -> crate::core::Result<LoadStats> {
    let config = args.apply(&services.config);

    // Validate before touching the network
    let pipeline = LoadingPipeline::new(&config)?;

    let catalog = services.catalog()?;
    pipeline.load(catalog.as_ref(), &args.path).await
}

/// Execute the load command
pub async fn execute(
    args: LoadArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = load(&args, services).await?;

    match format {
        OutputFormat::Human => {
            output::print_success(&format!(
                "Loaded {} into {}/{}",
                args.path.display(),
                stats.index,
                stats.namespace
            ));
            println!(
                "  {}: {}",
                colors::label("Documents"),
                colors::number(&stats.documents_loaded.to_string())
            );
            if stats.documents_skipped > 0 {
                println!(
                    "  {}: {}",
                    colors::label("Skipped"),
                    colors::warning(&stats.documents_skipped.to_string())
                );
            }
            println!(
                "  {}: {}",
                colors::label("Chunks"),
                colors::number(&stats.chunks_upserted.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Duration"),
                output::format_duration_colored(stats.duration_ms as f64 / 1000.0)
            );
            if stats.documents_loaded == 0 {
                output::print_warning("No documents matched the include patterns");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
