//! Relevance scoring for a single candidate string.
//!
//! Scores come from two branches. A case-insensitive substring hit scores
//! around 2000, penalised by match position and length slack. Anything else
//! falls through to an edit-distance score around 1000, with a bonus when a
//! word of the candidate starts with the query.

use crate::fuzzy::{collapse_whitespace, damerau_levenshtein, normalize_for_distance};
use serde::{Deserialize, Serialize};

/// Minimum score for a distance-branch match to pass the listing filter.
pub const MATCH_THRESHOLD: i64 = 200;

/// Bonus for a candidate word starting with the query.
pub const PREFIX_BONUS: i64 = 220;

const SUBSTRING_BASE: i64 = 2000;
const SUBSTRING_POSITION_PENALTY: i64 = 8;
const DISTANCE_BASE: i64 = 1000;
const DISTANCE_PENALTY: i64 = 90;

/// Which scoring path produced a [`Relevance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Empty query; every candidate is neutral
    Neutral,
    /// The candidate contains the query verbatim (case-insensitive)
    Substring,
    /// Approximate match by edit distance
    Distance,
}

/// Score of one candidate against one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relevance {
    /// Relevance score (higher is better, may be negative)
    pub score: i64,
    /// Branch that produced the score
    pub kind: MatchKind,
}

impl Relevance {
    /// Whether this result passes the listing filter.
    pub fn is_match(&self) -> bool {
        match self.kind {
            MatchKind::Neutral | MatchKind::Substring => true,
            MatchKind::Distance => self.score >= MATCH_THRESHOLD,
        }
    }
}

/// Trim and lowercase a query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Score `candidate` against `query`, reporting which branch was taken.
pub fn evaluate(candidate: &str, query: &str) -> Relevance {
    let query = normalize_query(query);
    if query.is_empty() {
        return Relevance { score: 0, kind: MatchKind::Neutral };
    }

    let folded = candidate.to_lowercase();
    if let Some(index) = char_position(&folded, &query) {
        let slack = char_len(&folded) - char_len(&query);
        return Relevance {
            score: SUBSTRING_BASE - SUBSTRING_POSITION_PENALTY * index - slack,
            kind: MatchKind::Substring,
        };
    }

    Relevance {
        score: distance_score_normalized(candidate, &query),
        kind: MatchKind::Distance,
    }
}

/// Score `candidate` against `query`.
///
/// Returns 0 for an empty or whitespace-only query. Callers must read that 0
/// as "no active filter", not as a weak match.
///
/// # Example
/// ```
/// use bulletin_search::score;
///
/// assert_eq!(score("Health", "helth"), 910);
/// assert_eq!(score("Health", "   "), 0);
/// ```
pub fn score(candidate: &str, query: &str) -> i64 {
    evaluate(candidate, query).score
}

/// Score `candidate` on the edit-distance branch only, skipping the
/// substring shortcut.
pub fn distance_score(candidate: &str, query: &str) -> i64 {
    let query = normalize_query(query);
    if query.is_empty() {
        return 0;
    }
    distance_score_normalized(candidate, &query)
}

/// Whether the lowercased candidate contains the normalized query.
pub fn is_direct_match(candidate: &str, query: &str) -> bool {
    let query = normalize_query(query);
    !query.is_empty() && candidate.to_lowercase().contains(&query)
}

/// Listing filter policy for a single field.
pub fn is_match(candidate: &str, query: &str) -> bool {
    evaluate(candidate, query).is_match()
}

fn distance_score_normalized(candidate: &str, query: &str) -> i64 {
    let normalized = normalize_for_distance(candidate);
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

    let word_distance = words
        .iter()
        .map(|word| damerau_levenshtein(query, word))
        .min()
        .unwrap_or_else(|| damerau_levenshtein(query, &normalized));

    let phrase_distance =
        damerau_levenshtein(&collapse_whitespace(query), &collapse_whitespace(&normalized));

    let best = word_distance.min(phrase_distance) as i64;
    let bonus = if words.iter().any(|word| word.starts_with(query)) {
        PREFIX_BONUS
    } else {
        0
    };

    DISTANCE_BASE - DISTANCE_PENALTY * best + bonus
}

fn char_position(haystack: &str, needle: &str) -> Option<i64> {
    haystack
        .find(needle)
        .map(|byte_index| char_len(&haystack[..byte_index]))
}

fn char_len(text: &str) -> i64 {
    text.chars().count() as i64
}
