//! WASM bindings for the listing page.

use crate::listing::{filter_and_sort, ListingQuery, ListingRecord};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Relevance score of `text` for `query`.
///
/// Scores are clamped into `i32` for JavaScript.
#[wasm_bindgen]
pub fn fuzzy_score(text: &str, query: &str) -> i32 {
    crate::score(text, query).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Damerau-Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    crate::damerau_levenshtein(a, b)
}

/// Order category names for a picker query.
///
/// # Arguments
/// * `options_json` - JSON array of category names
/// * `query` - Picker input
///
/// # Returns
/// JSON array of names, best match first (`[]` on malformed input)
#[wasm_bindgen]
pub fn rank_categories(options_json: &str, query: &str) -> String {
    let Ok(options) = serde_json::from_str::<Vec<String>>(options_json) else {
        return "[]".to_string();
    };
    serde_json::to_string(&crate::rank_options(options, query)).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    id: i64,
    title: String,
    description: String,
    #[serde(default)]
    category_names: Vec<String>,
    #[serde(default)]
    publication_timestamp: i64,
    #[serde(default)]
    last_update_timestamp: i64,
}

impl ListingRecord for Entry {
    fn id(&self) -> i64 {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn has_category(&self, name: &str) -> bool {
        self.category_names.iter().any(|c| c == name)
    }
    fn published_at(&self) -> i64 {
        self.publication_timestamp
    }
    fn updated_at(&self) -> i64 {
        self.last_update_timestamp
    }
}

#[derive(Serialize)]
struct Shown {
    id: i64,
    score: i64,
}

/// Filter and sort a listing.
///
/// # Arguments
/// * `items_json` - JSON array of `{id, title, description, categoryNames,
///   publicationTimestamp, lastUpdateTimestamp}`
/// * `query_json` - JSON `{search, categories, sort}`
///
/// # Returns
/// JSON array of `{id, score}` in display order (`[]` on malformed input)
#[wasm_bindgen]
pub fn filter_listing(items_json: &str, query_json: &str) -> String {
    let parsed = serde_json::from_str::<Vec<Entry>>(items_json)
        .and_then(|items| Ok((items, serde_json::from_str::<ListingQuery>(query_json)?)));
    let Ok((items, query)) = parsed else {
        return "[]".to_string();
    };

    let shown: Vec<Shown> = filter_and_sort(&items, &query)
        .into_iter()
        .map(|result| Shown { id: result.item.id, score: result.score })
        .collect();

    serde_json::to_string(&shown).unwrap_or_else(|_| "[]".to_string())
}
