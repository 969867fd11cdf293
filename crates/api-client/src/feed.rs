//! Client-side announcement listing
//!
//! A feed starts from a fallback dataset so there is always something to
//! show, then replaces it with whatever the server returns.

use crate::client::BulletinClient;
use crate::error::ApiResult;
use crate::notice::NoticeBoard;
use bulletin_core::model::Announcement;
use bulletin_search::{compare_labels, filter_and_sort, ListingQuery, SearchResult};

/// Listing records plus where they came from
#[derive(Debug, Clone)]
pub struct Feed {
    records: Vec<Announcement>,
    fallback: Vec<Announcement>,
    from_fallback: bool,
    seen_token: u64,
}

impl Feed {
    /// Feed showing `fallback` until the first successful refresh
    #[must_use]
    pub fn new(fallback: Vec<Announcement>) -> Self {
        Self {
            records: fallback.clone(),
            fallback,
            from_fallback: true,
            seen_token: 0,
        }
    }

    /// Replace the records with the server listing
    ///
    /// On failure the feed goes back to the fallback dataset and the error is
    /// returned for the caller to report.
    pub async fn refresh(&mut self, client: &BulletinClient) -> ApiResult<usize> {
        match client.announcements().list().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Feed refreshed");
                self.records = records;
                self.from_fallback = false;
                Ok(self.records.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot load announcements, showing fallback");
                self.records = self.fallback.clone();
                self.from_fallback = true;
                Err(e)
            }
        }
    }

    /// Refresh only when the board has accepted a notification since the
    /// last sync
    ///
    /// Returns whether a refresh was attempted.
    pub async fn sync(&mut self, client: &BulletinClient, board: &NoticeBoard) -> bool {
        if board.reload_token() == self.seen_token {
            return false;
        }
        self.seen_token = board.reload_token();
        // Failures are already logged and the fallback is in place
        let _ = self.refresh(client).await;
        true
    }

    /// Filter and sort the current records
    #[must_use]
    pub fn view(&self, query: &ListingQuery) -> Vec<SearchResult<&Announcement>> {
        filter_and_sort(&self.records, query)
    }

    /// Current records in server order
    #[must_use]
    pub fn records(&self) -> &[Announcement] {
        &self.records
    }

    /// Whether the records are the fallback dataset
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.from_fallback
    }

    /// Distinct category names used by the current records, alphabetised
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for category in self.records.iter().flat_map(|a| &a.categories) {
            if !names.contains(&category.name) {
                names.push(category.name.clone());
            }
        }
        names.sort_by(|a, b| compare_labels(a, b));
        names
    }
}
