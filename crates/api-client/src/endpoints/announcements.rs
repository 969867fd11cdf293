//! Announcement endpoints

use crate::client::BulletinClient;
use crate::error::ApiResult;
use bulletin_core::model::{Announcement, AnnouncementInput};
use bulletin_search::SortOrder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the server's `/search` route interprets the query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring, id ascending
    #[default]
    Contains,
    /// Typo-tolerant ranking
    Fuzzy,
}

impl SearchMode {
    /// Query parameter value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Announcements API interface
#[derive(Clone)]
pub struct AnnouncementsApi {
    client: BulletinClient,
}

impl AnnouncementsApi {
    pub(crate) fn new(client: BulletinClient) -> Self {
        Self { client }
    }

    /// All announcements, id ascending
    ///
    /// GET /api/announcements
    pub async fn list(&self) -> ApiResult<Vec<Announcement>> {
        self.client.get("api/announcements").await
    }

    /// GET /api/announcements/{id}
    pub async fn get(&self, id: i64) -> ApiResult<Announcement> {
        self.client.get(&format!("api/announcements/{id}")).await
    }

    /// Announcements tagged with a category
    ///
    /// GET /api/announcements/category/{categoryId}
    pub async fn by_category(&self, category_id: i64) -> ApiResult<Vec<Announcement>> {
        self.client
            .get(&format!("api/announcements/category/{category_id}"))
            .await
    }

    /// GET /api/announcements/search?q=&mode=
    pub async fn search(&self, q: &str, mode: SearchMode) -> ApiResult<Vec<Announcement>> {
        self.client
            .get_with_query("api/announcements/search", &[("q", q), ("mode", mode.as_str())])
            .await
    }

    /// Fuzzy search in an explicit order
    pub async fn search_sorted(&self, q: &str, sort: SortOrder) -> ApiResult<Vec<Announcement>> {
        self.client
            .get_with_query(
                "api/announcements/search",
                &[("q", q), ("mode", SearchMode::Fuzzy.as_str()), ("sort", sort.as_str())],
            )
            .await
    }

    /// Create an announcement (admin); subscribers are notified
    ///
    /// POST /api/announcements
    pub async fn create(&self, input: &AnnouncementInput) -> ApiResult<Announcement> {
        self.client.post("api/announcements", input).await
    }

    /// Replace an announcement's fields (admin)
    ///
    /// PUT /api/announcements/{id}
    pub async fn update(&self, id: i64, input: &AnnouncementInput) -> ApiResult<Announcement> {
        self.client.put(&format!("api/announcements/{id}"), input).await
    }

    /// DELETE /api/announcements/{id}
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("api/announcements/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_mode_names() {
        assert_eq!(SearchMode::default().as_str(), "contains");
        assert_eq!(SearchMode::Fuzzy.to_string(), "fuzzy");
        let parsed: SearchMode = serde_json::from_str(r#""fuzzy""#).unwrap();
        assert_eq!(parsed, SearchMode::Fuzzy);
    }
}
