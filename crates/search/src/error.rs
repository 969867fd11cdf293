//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised at the boundaries of the search crate.
///
/// Scoring itself never fails; this only covers parsing caller input.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Unknown sort order name
    #[error("Unknown sort order: {0}")]
    InvalidSortOrder(String),
}
