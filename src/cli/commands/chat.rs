//! Chat command - interactive chat grounded in one index

use crate::cli::output::{self, colors};
use crate::cli::repl::{Input, Prompt};
use crate::cli::OutputFormat;
use crate::core::chat::ChatSession;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Index to retrieve context from
    #[arg(long)]
    pub index: Option<String>,

    /// Namespace to retrieve context from
    #[arg(long)]
    pub namespace: Option<String>,
}

/// One turn, as printed in JSON mode
#[derive(Debug, Serialize)]
pub struct Turn<'a> {
    pub message: &'a str,
    pub reply: &'a str,
}

/// Build a session for the configured (or overridden) index
pub async fn open_session(
    args: &ChatArgs,
    services: &Services,
) -> crate::core::Result<ChatSession> {
    let mut config = (*services.config).clone();
    if let Some(index) = &args.index {
        config.index.name = index.clone();
    }
    if let Some(namespace) = &args.namespace {
        config.index.namespace = namespace.clone();
    }

    let llm = services.llm()?;
    let index = services.catalog()?.open_index(&config.index.name).await?;
    Ok(ChatSession::new(Arc::new(config), index, llm))
}

/// Execute the chat command
pub async fn execute(
    args: ChatArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&args, services).await?;

    if format == OutputFormat::Human {
        output::print_header("Chat started. Type 'exit' or 'quit' to leave.");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    converse(&mut session, stdin, format).await?;
    Ok(())
}

/// Run chat turns until exit. Returns the number of answered turns.
///
/// Blank lines are ignored; a failed turn is reported and the loop
/// continues.
pub async fn converse<R>(
    session: &mut ChatSession,
    input: R,
    format: OutputFormat,
) -> Result<usize, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    let label = match format {
        OutputFormat::Human => Some("You: "),
        OutputFormat::Json => None,
    };
    let mut prompt = Prompt::new(input, label).with_exit_words();
    let mut turns = 0;

    loop {
        let message = match prompt.read().await? {
            Input::Exit => break,
            Input::Line(line) if line.is_empty() => continue,
            Input::Line(line) => line,
        };

        let result = match format {
            OutputFormat::Human => {
                print!("{} ", colors::speaker("Assistant:"));
                let result = session.chat(&message, output::print_delta).await;
                println!();
                result
            }
            OutputFormat::Json => session.chat(&message, |_| {}).await,
        };

        match result {
            Ok(reply) => {
                turns += 1;
                if format == OutputFormat::Json {
                    let turn = Turn {
                        message: &message,
                        reply: &reply,
                    };
                    println!("{}", serde_json::to_string(&turn)?);
                }
            }
            Err(e) => output::print_error(&e.to_string()),
        }
    }

    Ok(turns)
}
