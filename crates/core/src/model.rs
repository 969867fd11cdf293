//! Domain records and request inputs
//!
//! JSON field names follow the web client (camelCase).

use bulletin_search::ListingRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An announcement category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A published announcement with its categories resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    /// Ordered by id
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Announcement {
    /// Category names joined for display, e.g. `"City, Health"`
    pub fn category_label(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the announcement carries the category with `id`
    pub fn has_category_id(&self, id: i64) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }
}

impl ListingRecord for Announcement {
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
        self.categories.iter().any(|c| c.name == name)
    }

    fn published_at(&self) -> i64 {
        self.publication_date.timestamp_millis()
    }

    fn updated_at(&self) -> i64 {
        self.last_update.timestamp_millis()
    }
}

/// Body of a category create or update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Required on create, ignored on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

/// Body of an announcement create or update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementInput {
    /// Required on create, ignored on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
    /// Single-category form accepted from older clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub publication_date: String,
}

impl AnnouncementInput {
    /// Requested category ids: `categoryIds` when non-empty, else `categoryId`
    pub fn category_ids(&self) -> Vec<i64> {
        match &self.category_ids {
            Some(ids) if !ids.is_empty() => ids.clone(),
            _ => self.category_id.into_iter().collect(),
        }
    }
}

impl From<&Announcement> for AnnouncementInput {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: Some(announcement.id),
            title: announcement.title.clone(),
            description: announcement.description.clone(),
            category_ids: Some(announcement.categories.iter().map(|c| c.id).collect()),
            category_id: None,
            publication_date: announcement.publication_date.to_rfc3339(),
        }
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
        }
    }
}

/// Message pushed to every open notification socket
///
/// Serialized as `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Notification {
    /// Sent once, right after a socket connects
    #[serde(rename = "connected")]
    Connected { message: String },
    /// A new announcement was stored
    #[serde(rename = "announcement.created")]
    AnnouncementCreated(Announcement),
}

impl Notification {
    /// The greeting sent to a freshly connected socket
    pub fn connected() -> Self {
        Self::Connected {
            message: "WebSocket connected".to_string(),
        }
    }

    /// Event name on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::AnnouncementCreated(_) => "announcement.created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_notification_wire_format() {
        let connected = serde_json::to_value(Notification::connected()).unwrap();
        assert_eq!(
            connected,
            serde_json::json!({"event": "connected", "data": {"message": "WebSocket connected"}})
        );

        let created = Notification::AnnouncementCreated(sample());
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["event"], "announcement.created");
        assert_eq!(json["data"]["title"], "Title 11");
        assert_eq!(created.event_name(), "announcement.created");

        let parsed: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, created);
    }

    fn sample() -> Announcement {
        let at = Utc.with_ymd_and_hms(2024, 2, 11, 8, 12, 0).unwrap();
        Announcement {
            id: 11,
            title: "Title 11".into(),
            description: "Mock description 11".into(),
            publication_date: at,
            last_update: at,
            categories: vec![Category::new(1, "City"), Category::new(2, "Health")],
        }
    }

    #[test]
    fn test_announcement_json_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["publicationDate"], "2024-02-11T08:12:00Z");
        assert_eq!(json["lastUpdate"], "2024-02-11T08:12:00Z");
        assert_eq!(json["categories"][1]["name"], "Health");
    }

    #[test]
    fn test_category_label() {
        assert_eq!(sample().category_label(), "City, Health");
    }

    #[test]
    fn test_listing_record_impl() {
        let a = sample();
        assert!(a.has_category("Health"));
        assert!(!a.has_category("health"));
        assert!(a.has_category_id(1));
        assert_eq!(a.published_at(), a.publication_date.timestamp_millis());
    }

    #[test]
    fn test_category_ids_prefers_list() {
        let input: AnnouncementInput =
            serde_json::from_str(r#"{"categoryIds":[3,1],"categoryId":7}"#).unwrap();
        assert_eq!(input.category_ids(), vec![3, 1]);
    }

    #[test]
    fn test_category_ids_falls_back_to_single() {
        let input: AnnouncementInput =
            serde_json::from_str(r#"{"categoryIds":[],"categoryId":7}"#).unwrap();
        assert_eq!(input.category_ids(), vec![7]);

        assert!(AnnouncementInput::default().category_ids().is_empty());
    }

    #[test]
    fn test_input_from_announcement() {
        let input = AnnouncementInput::from(&sample());
        assert_eq!(input.id, Some(11));
        assert_eq!(input.category_ids(), vec![1, 2]);
        assert_eq!(input.publication_date, "2024-02-11T08:12:00+00:00");
    }
}
