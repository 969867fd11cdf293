//! Ordering of scored candidates.

use crate::fuzzy::strip_diacritics;
use crate::relevance::{normalize_query, score};
use std::cmp::Ordering;

/// Compare two display labels the way a reader would alphabetise them.
///
/// Letters compare case- and accent-insensitively first; remaining ties put
/// unaccented before accented and lowercase before uppercase, then fall back
/// to code points so the order is total.
pub fn compare_labels(left: &str, right: &str) -> Ordering {
    primary_key(left)
        .cmp(&primary_key(right))
        .then_with(|| left.to_lowercase().cmp(&right.to_lowercase()))
        .then_with(|| case_key(left).cmp(&case_key(right)))
        .then_with(|| left.cmp(right))
}

fn primary_key(label: &str) -> String {
    strip_diacritics(&label.to_lowercase())
}

fn case_key(label: &str) -> Vec<bool> {
    label.chars().map(char::is_uppercase).collect()
}

/// Relevance order: score descending, then label, then stable key ascending.
pub fn relevance_order(
    (left_score, left_label, left_key): (i64, &str, i64),
    (right_score, right_label, right_key): (i64, &str, i64),
) -> Ordering {
    right_score
        .cmp(&left_score)
        .then_with(|| compare_labels(left_label, right_label))
        .then_with(|| left_key.cmp(&right_key))
}

/// Order picker options by how well they match `query`.
///
/// An empty query leaves the options untouched. Otherwise every option is
/// kept and sorted by score, best first, with ties alphabetised.
///
/// # Example
/// ```
/// use bulletin_search::rank_options;
///
/// let ranked = rank_options(vec!["City", "Health", "Community events"], "helth");
/// assert_eq!(ranked[0], "Health");
/// ```
pub fn rank_options<S: AsRef<str>>(options: Vec<S>, query: &str) -> Vec<S> {
    if normalize_query(query).is_empty() {
        return options;
    }

    let mut scored: Vec<(i64, S)> = options
        .into_iter()
        .map(|option| (score(option.as_ref(), query), option))
        .collect();

    scored.sort_by(|(left_score, left), (right_score, right)| {
        right_score
            .cmp(left_score)
            .then_with(|| compare_labels(left.as_ref(), right.as_ref()))
    });

    scored.into_iter().map(|(_, option)| option).collect()
}
