//! Edit distance and text normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Combining accents as well as spacing marks such as `^`, `` ` `` and `¨`
static DIACRITIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Diacritic}").expect("diacritic pattern"));

/// Calculate the Damerau-Levenshtein edit distance between two strings.
///
/// Insertions, deletions, substitutions and transpositions of two adjacent
/// characters each cost 1. This is the optimal-string-alignment variant: a
/// transposed pair is never edited again, so `("ca", "abc")` costs 3.
///
/// # Arguments
/// * `source` - String being transformed
/// * `target` - String to transform into
///
/// # Returns
/// Number of edits needed to transform `source` into `target`
pub fn damerau_levenshtein(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let m = source.len();
    let n = target.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // The transposition rule reaches two rows back, so keep the full table
    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(source[i - 1] != target[j - 1]);
            let mut best = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + cost);

            let transposed = i > 1
                && j > 1
                && source[i - 1] == target[j - 2]
                && source[i - 2] == target[j - 1];
            if transposed {
                best = best.min(table[i - 2][j - 2] + 1);
            }

            table[i][j] = best;
        }
    }

    table[m][n]
}

/// Strip diacritical marks by decomposing to NFD and dropping every
/// character with the Unicode `Diacritic` property.
///
/// Spacing marks vanish too, so `don`t` folds to `dont` rather than
/// splitting into two words.
pub fn strip_diacritics(text: &str) -> String {
    let decomposed: String = text.nfd().collect();
    DIACRITIC.replace_all(&decomposed, "").into_owned()
}

/// Normalize text for distance comparisons.
///
/// Lowercases, strips diacritics, turns every run of characters outside
/// `[a-z0-9]` into a single space and trims the result. Text with no ASCII
/// alphanumerics normalizes to the empty string.
pub fn normalize_for_distance(text: &str) -> String {
    let folded = strip_diacritics(&text.to_lowercase());

    let mut normalized = String::with_capacity(folded.len());
    let mut pending_space = false;

    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(c);
        } else {
            pending_space = true;
        }
    }

    normalized
}

/// Remove every whitespace character.
pub fn collapse_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
