//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one word row with its review counters.
    pub fn word_row(id: i64, english: &str, spanish: &str, correct: i64, wrong: i64) {
        println!(
            "  {} {} {} {} ({} {}, {} {})",
            style(format!("{:>5}", id)).dim(),
            style(pad(english, 24)).bold(),
            style("→").dim(),
            pad(spanish, 24),
            style(correct).green(),
            style("right").dim(),
            style(wrong).red(),
            style("wrong").dim(),
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Pad to a display width counted in characters, not bytes.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
