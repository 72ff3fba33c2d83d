//! Agent command - interactive chat that picks the CV per question

use crate::cli::commands::chat::Turn;
use crate::cli::output::{self, colors};
use crate::cli::repl::{Input, Prompt};
use crate::cli::OutputFormat;
use crate::core::chat::CvChatAgent;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Arguments for the agent command
#[derive(Args, Debug)]
pub struct AgentArgs {}

/// Execute the agent command
pub async fn execute(
    _args: AgentArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = CvChatAgent::new(&services.config, services.catalog()?, services.llm()?);

    if format == OutputFormat::Human {
        output::print_header("CV agent started. Type 'exit' or 'quit' to leave.");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    converse(&mut agent, stdin, format).await?;
    Ok(())
}

/// Run agent turns until exit. Returns the number of answered turns.
pub async fn converse<R>(
    agent: &mut CvChatAgent,
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
                let mut streamed = false;
                let result = agent
                    .chat(&message, |delta| {
                        if !streamed {
                            print!("{} ", colors::speaker("Agent:"));
                            streamed = true;
                        }
                        output::print_delta(delta);
                    })
                    .await;
                // Fixed replies are not streamed
                match (&result, streamed) {
                    (Ok(reply), false) => println!("{} {}", colors::speaker("Agent:"), reply),
                    (_, true) => println!(),
                    _ => {}
                }
                result
            }
            OutputFormat::Json => agent.chat(&message, |_| {}).await,
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
