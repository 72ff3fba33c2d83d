//! Line-oriented interactive input.
//!
//! Reads lines from any async reader so loops can be driven by stdin
//! in the binary and by byte slices in tests. Ctrl-C ends input the
//! same way EOF does.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A trimmed line
    Line(String),
    /// EOF, Ctrl-C or an exit word
    Exit,
}

/// Prompting line reader
pub struct Prompt<R> {
    lines: Lines<R>,
    label: Option<String>,
    exit_words: bool,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    /// `label` is printed before each read when set.
    pub fn new(reader: R, label: Option<&str>) -> Self {
        Self {
            lines: reader.lines(),
            label: label.map(str::to_string),
            exit_words: false,
        }
    }

    /// Treat `exit` and `quit` as end of input
    pub fn with_exit_words(mut self) -> Self {
        self.exit_words = true;
        self
    }

    /// Read the next line.
    pub async fn read(&mut self) -> std::io::Result<Input> {
        if let Some(label) = &self.label {
            let mut stdout = std::io::stdout();
            write!(stdout, "{label}")?;
            stdout.flush()?;
        }

        let line = tokio::select! {
            line = self.lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };

        Ok(match line {
            None => Input::Exit,
            Some(line) => {
                let line = line.trim().to_string();
                if self.exit_words && is_exit_word(&line) {
                    Input::Exit
                } else {
                    Input::Line(line)
                }
            }
        })
    }
}

/// `exit` or `quit`, any case
pub fn is_exit_word(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}
