//! Listing filter and sort for announcement feeds.
//!
//! A listing is filtered twice: by selected category names, then by the
//! search query scored against title and description. The survivors are
//! sorted by the requested [`SortOrder`], always tie-breaking on record id.

use crate::error::SearchError;
use crate::ranking::{compare_labels, relevance_order};
use crate::relevance::{evaluate, normalize_query, MatchKind};
use crate::SearchResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A record the listing can filter and sort.
pub trait ListingRecord {
    /// Stable identifier, used as the final tie-break
    fn id(&self) -> i64;
    /// Announcement title
    fn title(&self) -> &str;
    /// Announcement body
    fn description(&self) -> &str;
    /// Whether the record is tagged with the category called `name`
    fn has_category(&self, name: &str) -> bool;
    /// Publication time in milliseconds since the Unix epoch
    fn published_at(&self) -> i64;
    /// Last modification time in milliseconds since the Unix epoch
    fn updated_at(&self) -> i64;
}

/// Listing sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Newest publication first
    #[default]
    PublicationDateDesc,
    /// Oldest publication first
    PublicationDateAsc,
    /// Most recently updated first
    LastUpdateDesc,
    /// Least recently updated first
    LastUpdateAsc,
    /// Title A to Z
    TitleAsc,
    /// Title Z to A
    TitleDesc,
    /// Best match first, then title
    Relevance,
}

impl SortOrder {
    /// All sort orders, default first.
    pub const ALL: [SortOrder; 7] = [
        SortOrder::PublicationDateDesc,
        SortOrder::PublicationDateAsc,
        SortOrder::LastUpdateDesc,
        SortOrder::LastUpdateAsc,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
        SortOrder::Relevance,
    ];

    /// Kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicationDateDesc => "publication-date-desc",
            Self::PublicationDateAsc => "publication-date-asc",
            Self::LastUpdateDesc => "last-update-desc",
            Self::LastUpdateAsc => "last-update-asc",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
            Self::Relevance => "relevance",
        }
    }

    fn compare<R: ListingRecord>(
        self,
        left: &SearchResult<&R>,
        right: &SearchResult<&R>,
    ) -> Ordering {
        let (l, r) = (left.item, right.item);
        let primary = match self {
            Self::PublicationDateDesc => r.published_at().cmp(&l.published_at()),
            Self::PublicationDateAsc => l.published_at().cmp(&r.published_at()),
            Self::LastUpdateDesc => r.updated_at().cmp(&l.updated_at()),
            Self::LastUpdateAsc => l.updated_at().cmp(&r.updated_at()),
            Self::TitleAsc => compare_labels(l.title(), r.title()),
            Self::TitleDesc => compare_labels(r.title(), l.title()),
            Self::Relevance => {
                return relevance_order(
                    (left.score, l.title(), l.id()),
                    (right.score, r.title(), r.id()),
                );
            }
        };
        primary.then_with(|| l.id().cmp(&r.id()))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = SearchError;

    /// Accepts kebab-case names and the camelCase names used by web clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|order| {
                order.as_str().eq_ignore_ascii_case(key)
                    || order.as_str().replace('-', "").eq_ignore_ascii_case(key)
            })
            .ok_or_else(|| SearchError::InvalidSortOrder(s.to_string()))
    }
}

/// What the reader asked the listing for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Free-text search (empty means no text filter)
    #[serde(default)]
    pub search: String,
    /// Selected category names; a record must carry at least one
    #[serde(default)]
    pub categories: Vec<String>,
    /// Sort order
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListingQuery {
    /// Create an unfiltered query in default order
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Add a selected category
    #[must_use]
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(name.into());
        self
    }

    /// Set the sort order
    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Score one record against the query: best of title and description.
///
/// Returns `None` when the record is filtered out.
pub fn score_record<R: ListingRecord>(record: &R, query: &ListingQuery) -> Option<i64> {
    let in_category = query.categories.is_empty()
        || query.categories.iter().any(|name| record.has_category(name));
    if !in_category {
        return None;
    }

    if normalize_query(&query.search).is_empty() {
        return Some(0);
    }

    let title = evaluate(record.title(), &query.search);
    let description = evaluate(record.description(), &query.search);
    let direct = title.kind == MatchKind::Substring || description.kind == MatchKind::Substring;
    let best = title.score.max(description.score);

    (direct || title.is_match() || description.is_match()).then_some(best)
}

/// Filter and sort `records` for display.
///
/// # Example
/// ```
/// use bulletin_search::listing::{filter_and_sort, ListingQuery, ListingRecord, SortOrder};
///
/// struct Note(i64, &'static str);
///
/// impl ListingRecord for Note {
///     fn id(&self) -> i64 { self.0 }
///     fn title(&self) -> &str { self.1 }
///     fn description(&self) -> &str { "" }
///     fn has_category(&self, _name: &str) -> bool { true }
///     fn published_at(&self) -> i64 { 0 }
///     fn updated_at(&self) -> i64 { 0 }
/// }
///
/// let notes = [Note(1, "Road works"), Note(2, "Flu shots")];
/// let query = ListingQuery::new().with_search("flu").with_sort(SortOrder::Relevance);
/// let shown = filter_and_sort(&notes, &query);
/// assert_eq!(shown[0].item.id(), 2);
/// ```
pub fn filter_and_sort<'a, R>(records: &'a [R], query: &ListingQuery) -> Vec<SearchResult<&'a R>>
where
    R: ListingRecord + Sync,
{
    let mut results = collect_matches(records, query);
    let order = query.sort;
    results.sort_by(|left, right| order.compare(left, right));
    results
}

fn collect_matches<'a, R>(records: &'a [R], query: &ListingQuery) -> Vec<SearchResult<&'a R>>
where
    R: ListingRecord + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        records
            .par_iter()
            .filter_map(|record| {
                score_record(record, query).map(|score| SearchResult { item: record, score })
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        records
            .iter()
            .filter_map(|record| {
                score_record(record, query).map(|score| SearchResult { item: record, score })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: i64,
        title: &'static str,
        description: &'static str,
        categories: &'static [&'static str],
        published: i64,
        updated: i64,
    }

    impl ListingRecord for Item {
        fn id(&self) -> i64 {
            self.id
        }
        fn title(&self) -> &str {
            self.title
        }
        fn description(&self) -> &str {
            self.description
        }
        fn has_category(&self, name: &str) -> bool {
            self.categories.contains(&name)
        }
        fn published_at(&self) -> i64 {
            self.published
        }
        fn updated_at(&self) -> i64 {
            self.updated
        }
    }

    fn item(
        id: i64,
        (title, description): (&'static str, &'static str),
        categories: &'static [&'static str],
        (published, updated): (i64, i64),
    ) -> Item {
        Item {
            id,
            title,
            description,
            categories,
            published,
            updated,
        }
    }

    fn items() -> Vec<Item> {
        vec![
            item(3, ("Road closure", "Main street closed"), &["City"], (300, 300)),
            item(1, ("Flu vaccination", "Free shots at the clinic"), &["Health"], (100, 500)),
            item(
                2,
                ("Health fair", "Screenings and talks"),
                &["Health", "Community events"],
                (300, 200),
            ),
            item(4, ("Health fair", "Second day"), &["Health"], (50, 50)),
        ]
    }

    fn sorted(items: &[Item], sort: SortOrder) -> Vec<i64> {
        ids(&filter_and_sort(items, &ListingQuery::new().with_sort(sort)))
    }

    fn ids(results: &[SearchResult<&Item>]) -> Vec<i64> {
        results.iter().map(|r| r.item.id).collect()
    }

    #[test]
    fn test_default_order_is_newest_first_with_id_tiebreak() {
        let items = items();
        let results = filter_and_sort(&items, &ListingQuery::new());
        assert_eq!(ids(&results), vec![2, 3, 1, 4]);
        assert!(results.iter().all(|r| r.score == 0));
    }

    #[test]
    fn test_other_orders() {
        let items = items();
        assert_eq!(sorted(&items, SortOrder::PublicationDateAsc), vec![4, 1, 2, 3]);
        assert_eq!(sorted(&items, SortOrder::LastUpdateDesc), vec![1, 3, 2, 4]);
        assert_eq!(sorted(&items, SortOrder::TitleAsc), vec![1, 2, 4, 3]);
        assert_eq!(sorted(&items, SortOrder::TitleDesc), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_category_filter() {
        let items = items();
        let query = ListingQuery::new().with_category("Community events").with_category("City");
        assert_eq!(ids(&filter_and_sort(&items, &query)), vec![2, 3]);
    }

    #[test]
    fn test_search_direct_match_in_description() {
        let items = items();
        let query = ListingQuery::new().with_search("CLINIC").with_sort(SortOrder::Relevance);
        let results = filter_and_sort(&items, &query);
        assert_eq!(results[0].item.id, 1);
        assert_eq!(results[0].score, 2000 - 8 * 18 - 18);
        assert!(results[1..].iter().all(|r| r.score < 2000 - 8 * 18 - 18));
    }

    #[test]
    fn test_relevance_ties_break_on_title_then_id() {
        let items = items();
        let query = ListingQuery::new().with_search("health fair").with_sort(SortOrder::Relevance);
        let results = filter_and_sort(&items, &query);
        assert_eq!(ids(&results)[..2], [2, 4]);
        assert_eq!(results[0].score, results[1].score);
    }

    #[test]
    fn test_far_query_is_excluded() {
        let items = items();
        let query = ListingQuery::new().with_search("zzzzzzzzzzzzzzzzzzzz");
        assert!(filter_and_sort(&items, &query).is_empty());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("relevance".parse::<SortOrder>().unwrap(), SortOrder::Relevance);
        assert_eq!(
            "publicationDateAsc".parse::<SortOrder>().unwrap(),
            SortOrder::PublicationDateAsc
        );
        assert_eq!("title-desc".parse::<SortOrder>().unwrap(), SortOrder::TitleDesc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_order_display_roundtrip() {
        for order in SortOrder::ALL {
            assert_eq!(order.to_string().parse::<SortOrder>().unwrap(), order);
        }
    }
}
