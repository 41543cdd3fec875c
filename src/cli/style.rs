//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when
//! stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::IsTerminal;

/// Check mark for completed work
pub const CHECK: &str = "✓";

/// Cross for failures
pub const CROSS: &str = "✗";

/// Semantic colours for CLI output
pub trait Stylize {
    /// Headline text
    fn emphasis(&self) -> String;
    /// Names the operator should notice (branches, PR numbers)
    fn accent(&self) -> String;
    /// Secondary information
    fn muted(&self) -> String;
    /// Positive outcome
    fn success(&self) -> String;
    /// Something needs attention
    fn warn(&self) -> String;
    /// Failure
    fn error(&self) -> String;
}

impl<T: Display + ?Sized> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Muted arrow for nested lines
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used while waiting on the network
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// `text` as a clickable link when the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    if url.is_empty() || !std::io::stdout().is_terminal() || !supports_hyperlinks::supports_hyperlinks()
    {
        return text.to_string();
    }
    terminal_link::Link::new(text, url).to_string()
}
