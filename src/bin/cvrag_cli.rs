//! cvrag CLI - chat with your CVs
//!
//! Loads CV documents into a hosted vector index and answers
//! questions about them.
//!
//! # Examples
//!
//! ```bash
//! # Preview how a CV will be chunked (offline)
//! cvrag chunk cvs/alice.txt --size 500 --overlap 50
//!
//! # Load a directory of CVs
//! cvrag load ./cvs --index cv-index
//!
//! # Search loaded chunks
//! cvrag search "kubernetes experience" -k 5
//!
//! # Chat grounded in one index, or let the agent pick the CV
//! cvrag chat
//! cvrag agent
//! ```
//!
//! Logs go to stderr; set `CVRAG_LOG` (or `RUST_LOG`) to change the
//! filter, e.g. `CVRAG_LOG=cvrag=debug`, and `CVRAG_LOG_FORMAT=json`
//! for one JSON object per line.

use clap::Parser;
use cvrag::cli::{run, Cli};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = std::env::var("CVRAG_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("cvrag=info"));

    let json = std::env::var("CVRAG_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    // Critical: stderr not stdout, answers and JSON output go to stdout
    let layer = fmt::layer().with_writer(std::io::stderr);
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.with_target(false).compact()).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
