//! Search command - similarity search over loaded chunks

use crate::cli::output::{self, colors};
use crate::cli::repl::{Input, Prompt};
use crate::cli::OutputFormat;
use crate::core::providers::VectorIndex;
use crate::core::retrieval::Retriever;
use crate::core::services::Services;
use crate::core::types::SearchHit;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query; omit to enter queries interactively
    pub query: Option<String>,

    /// Index to search
    #[arg(long)]
    pub index: Option<String>,

    /// Namespace to search
    #[arg(long)]
    pub namespace: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub index: String,
    pub namespace: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Resolved search target
pub struct Searcher {
    index: Arc<dyn VectorIndex>,
    namespace: String,
    retriever: Retriever,
    limit: usize,
}

impl Searcher {
    /// Open the index named by `args` or the configuration
    pub async fn open(args: &SearchArgs, services: &Services) -> crate::core::Result<Self> {
        let config = &services.config;
        let name = args.index.as_deref().unwrap_or(&config.index.name);
        let index = services.catalog()?.open_index(name).await?;

        Ok(Self {
            index,
            namespace: args
                .namespace
                .clone()
                .unwrap_or_else(|| config.index.namespace.clone()),
            retriever: Retriever::new(&config.retrieval),
            limit: args.limit.unwrap_or(config.retrieval.top_k),
        })
    }

    pub async fn search(&self, query: &str) -> crate::core::Result<SearchOutput> {
        let results = self
            .retriever
            .search_similar(self.index.as_ref(), &self.namespace, query, self.limit)
            .await?;

        Ok(SearchOutput {
            query: query.trim().to_string(),
            index: self.index.name().to_string(),
            namespace: self.namespace.clone(),
            total_results: results.len(),
            results,
        })
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let searcher = Searcher::open(&args, services).await?;

    match &args.query {
        Some(query) => {
            let output = searcher.search(query).await?;
            print_results(&output, format)?;
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            interactive(&searcher, stdin, format).await?;
        }
    }

    Ok(())
}

/// Answer queries line by line until an empty line or EOF.
///
/// Returns the number of queries run. A failed query is reported
/// and the loop continues.
pub async fn interactive<R>(
    searcher: &Searcher,
    input: R,
    format: OutputFormat,
) -> Result<usize, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    let label = match format {
        OutputFormat::Human => Some("Query (empty line to exit): "),
        OutputFormat::Json => None,
    };
    let mut prompt = Prompt::new(input, label);
    let mut queries = 0;

    loop {
        let query = match prompt.read().await? {
            Input::Line(line) if !line.is_empty() => line,
            _ => break,
        };

        match searcher.search(&query).await {
            Ok(output) => {
                queries += 1;
                print_results(&output, format)?;
            }
            Err(e) => output::print_error(&e.to_string()),
        }
    }

    Ok(queries)
}

fn print_results(
    output: &SearchOutput,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results found for '{}' in '{}'",
                    colors::label(&output.query),
                    colors::index_name(&output.index)
                );
            } else {
                println!(
                    "Found {} result(s) in '{}/{}':\n",
                    colors::number(&output.total_results.to_string()),
                    colors::index_name(&output.index),
                    colors::index_name(&output.namespace)
                );

                for (i, hit) in output.results.iter().enumerate() {
                    println!(
                        "[{}] {} {} {}",
                        colors::rank(&(i + 1).to_string()),
                        colors::label(&hit.id),
                        colors::score(&format!("(score: {:.2})", hit.score)),
                        colors::dim(&hit.category)
                    );
                    for line in hit.text.lines().take(5) {
                        println!("    {}", colors::dim(&output::preview(line, 100)));
                    }
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(output)?);
        }
    }

    Ok(())
}
