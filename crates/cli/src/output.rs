//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use bulletin_core::model::Announcement;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// How commands print their results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

impl OutputFormat {
    /// Whether results should be printed as JSON
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a timestamp the way the listing shows it
///
/// `Aug 11, 2023` or, with the time, `Aug 11, 2023, 04:38` (24-hour, UTC).
pub fn format_listing_date(value: &DateTime<Utc>, with_time: bool) -> String {
    if with_time {
        value.format("%b %d, %Y, %H:%M").to_string()
    } else {
        value.format("%b %d, %Y").to_string()
    }
}

/// One listing line: id, title, categories and publication date
pub fn announcement_line(announcement: &Announcement) -> String {
    let categories = announcement.category_label();
    format!(
        "{:>4}  {}  [{}]  {}",
        announcement.id,
        announcement.title.bold(),
        if categories.is_empty() { "Unknown".to_string() } else { categories },
        format_listing_date(&announcement.publication_date, true).dimmed()
    )
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
