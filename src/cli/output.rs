//! Output formatting for CLI commands
//!
//! Provides utilities for formatting command output in human-readable
//! or JSON formats. Supports colored output (respects NO_COLOR env var).

use std::io::Write;

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Style for labels/headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    /// Style for index and namespace names
    pub fn index_name(s: &str) -> ColoredString {
        s.cyan()
    }

    /// Style for file paths
    pub fn file_path(s: &str) -> ColoredString {
        s.blue()
    }

    /// Style for numbers/counts
    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for success messages
    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    /// Style for warning messages
    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for error messages
    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    /// Style for dim/secondary text
    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }

    /// Style for search scores
    pub fn score(s: &str) -> ColoredString {
        s.magenta()
    }

    /// Style for rank numbers
    pub fn rank(s: &str) -> ColoredString {
        s.green().bold()
    }

    /// Style for the speaker tag in chat loops
    pub fn speaker(s: &str) -> ColoredString {
        s.cyan().bold()
    }
}

/// Format bytes into human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    let gb_val = bytes as f64 / GB as f64;
    let mb_val = bytes as f64 / MB as f64;
    let kb_val = bytes as f64 / KB as f64;

    if bytes >= GB {
        format!("{gb_val:.1} GB")
    } else if bytes >= MB {
        format!("{mb_val:.1} MB")
    } else if bytes >= KB {
        format!("{kb_val:.1} KB")
    } else {
        format!("{bytes} B")
    }
}

/// Format duration into human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{mins:.0}m {remaining_secs:.1}s")
    } else if secs >= 1.0 {
        format!("{secs:.2}s")
    } else {
        let ms = secs * 1000.0;
        format!("{ms:.0}ms")
    }
}

/// Format duration with color
pub fn format_duration_colored(secs: f64) -> String {
    format!("{}", colors::number(&format_duration(secs)))
}

/// Single-line preview: newlines collapsed, at most `max` characters
pub fn preview(text: &str, max: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let count = flat.chars().count();
    if count > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

/// Print a streamed text delta immediately
pub fn print_delta(delta: &str) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{delta}");
    let _ = stdout.flush();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}", colors::success(message));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", colors::warning("Warning"), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}: {}", colors::error("Error"), message);
}

/// Print a header/title
pub fn print_header(title: &str) {
    println!("{}", colors::label(title));
}
