//! Chunk command - preview how a document will be split

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::indexer::Chunker;
use crate::core::services::Services;
use crate::core::types::Chunk;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the chunk command
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Document to chunk
    pub file: PathBuf,

    /// Characters per chunk (defaults to configuration)
    #[arg(long)]
    pub size: Option<usize>,

    /// Characters shared by consecutive chunks (defaults to configuration)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Characters of each chunk to show
    #[arg(long, default_value = "60")]
    pub preview: usize,
}

/// Chunk command response
#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    pub file: String,
    pub bytes: u64,
    pub characters: usize,
    pub chunk_size: usize,
    pub overlap: usize,
    pub total_chunks: usize,
    pub chunks: Vec<Chunk>,
}

/// Chunk a file with the effective settings
pub fn chunk_file(
    args: &ChunkArgs,
    services: &Services,
) -> Result<ChunkOutput, Box<dyn std::error::Error>> {
    let chunking = &services.config.chunking;
    let chunker = Chunker::new(
        args.size.unwrap_or(chunking.chunk_size),
        args.overlap.unwrap_or(chunking.overlap),
    )?;

    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read {}: {e}", args.file.display()))?;
    let chunks = chunker.chunk_text(&text);

    Ok(ChunkOutput {
        file: args.file.display().to_string(),
        bytes: text.len() as u64,
        characters: text.chars().count(),
        chunk_size: chunker.chunk_size(),
        overlap: chunker.overlap(),
        total_chunks: chunks.len(),
        chunks,
    })
}

/// Execute the chunk command
pub async fn execute(
    args: ChunkArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = chunk_file(&args, services)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} ({}, {} chars)",
                colors::file_path(&output.file),
                output::format_bytes(output.bytes),
                colors::number(&output.characters.to_string())
            );
            println!(
                "{} chunk(s) of {} chars, overlap {}\n",
                colors::number(&output.total_chunks.to_string()),
                output.chunk_size,
                output.overlap
            );

            for chunk in &output.chunks {
                println!(
                    "[{}] {} {}",
                    colors::rank(&chunk.index.to_string()),
                    colors::dim(&format!("chars {}..{}", chunk.start, chunk.end)),
                    output::preview(&chunk.text, args.preview)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
