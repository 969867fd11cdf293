//! Fuzzy matching and ranking for Bulletin announcement listings.
//!
//! This crate provides:
//! - Two-branch relevance scoring (substring fast path, edit-distance fallback)
//! - Damerau-Levenshtein edit distance
//! - Diacritic-insensitive normalization
//! - Listing filter and sort with deterministic tie-breaks
//!
//! Everything here is pure and safe to call from any thread.

mod error;
mod fuzzy;
pub mod listing;
mod ranking;
mod relevance;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{Result, SearchError};
pub use fuzzy::{collapse_whitespace, damerau_levenshtein, normalize_for_distance, strip_diacritics};
pub use listing::{filter_and_sort, ListingQuery, ListingRecord, SortOrder};
pub use ranking::{compare_labels, rank_options, relevance_order};
pub use relevance::{
    distance_score, evaluate, is_direct_match, is_match, normalize_query, score, MatchKind,
    Relevance, MATCH_THRESHOLD, PREFIX_BONUS,
};

/// Search result with relevance score.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Relevance score (higher is better; 0 when no query was given)
    pub score: i64,
}
