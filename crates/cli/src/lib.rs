//! Terminal helpers for the Bulletin command-line tools
//!
//! Provides shared CLI functionality:
//! - Status messages and listing rendering
//! - Text or JSON output selection
//! - Progress indicators

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
