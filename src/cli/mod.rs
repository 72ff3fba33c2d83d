//! CLI adapter for cvrag
//!
//! Provides the command-line interface for loading CVs, searching
//! them and chatting about them. Depends on `core/`; nothing in
//! `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +------------------+
//! ```

pub mod commands;
pub mod output;
pub mod repl;

use clap::{Parser, Subcommand};

/// cvrag - Chat with your CVs
///
/// Load CV documents into a hosted vector index, then search them or
/// ask questions answered from their content.
#[derive(Parser, Debug)]
#[command(name = "cvrag")]
#[command(version)]
#[command(about = "Retrieval-augmented chat over CVs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a document into chunks and preview them (offline)
    Chunk(commands::ChunkArgs),

    /// Load documents into the vector index
    Load(commands::LoadArgs),

    /// Search the vector index
    ///
    /// Without a query, reads queries interactively until an empty
    /// line.
    Search(commands::SearchArgs),

    /// Chat about the CVs in one index
    Chat(commands::ChatArgs),

    /// Chat with the agent that picks the relevant CV per question
    Agent(commands::AgentArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  cvrag completions bash > ~/.local/share/bash-completion/completions/cvrag
    ///   zsh:   cvrag completions zsh > ~/.zfunc/_cvrag
    ///   fish:  cvrag completions fish > ~/.config/fish/completions/cvrag.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::{Config, Credentials};
    use crate::core::services::Services;
    use std::sync::Arc;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Create services; clients are only built for keys that are set
    let credentials = Credentials::from_env();
    tracing::debug!("Credentials: {:?}", credentials);
    let services = Arc::new(Services::from_config(config, &credentials)?);

    // Execute command
    match cli.command {
        Commands::Chunk(args) => commands::chunk::execute(args, &services, cli.format).await,
        Commands::Load(args) => commands::load::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Chat(args) => commands::chat::execute(args, &services, cli.format).await,
        Commands::Agent(args) => commands::agent::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, &credentials, cli.format).await
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
