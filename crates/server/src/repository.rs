//! Storage for categories and announcements
//!
//! Announcements store category ids and are resolved against the current
//! categories on every read, so a rename shows up everywhere at once.

use bulletin_core::model::{Announcement, AnnouncementInput, Category};
use bulletin_core::seed::Dataset;
use bulletin_core::validation::parse_timestamp;
use bulletin_core::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use tokio::sync::RwLock;

/// Message for a duplicate id or category name
pub const UNIQUE_VIOLATION: &str = "Unique constraint violation";

/// Validated announcement fields, ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub description: String,
    pub category_ids: BTreeSet<i64>,
    pub publication_date: DateTime<Utc>,
}

impl AnnouncementDraft {
    /// Build from an input that already passed validation
    ///
    /// Text fields are trimmed and repeated category ids collapse.
    pub fn from_input(input: &AnnouncementInput) -> Result<Self> {
        let publication_date = parse_timestamp(&input.publication_date).ok_or_else(|| {
            Error::validation("Validation failed: publicationDate: Must be a valid date")
        })?;

        Ok(Self {
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category_ids: input.category_ids().into_iter().collect(),
            publication_date,
        })
    }
}

/// Persistent store behind the API
///
/// Lists are returned in ascending id order.
pub trait Repository: Send + Sync + 'static {
    fn categories(&self) -> impl Future<Output = Vec<Category>> + Send;

    fn category(&self, id: i64) -> impl Future<Output = Result<Category>> + Send;

    /// Fails with a conflict when the id or the name is taken
    fn create_category(&self, category: Category) -> impl Future<Output = Result<Category>> + Send;

    fn rename_category(
        &self,
        id: i64,
        name: String,
    ) -> impl Future<Output = Result<Category>> + Send;

    /// Fails with a relation violation while announcements still use the category
    fn delete_category(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    fn announcements(&self) -> impl Future<Output = Vec<Announcement>> + Send;

    fn announcement(&self, id: i64) -> impl Future<Output = Result<Announcement>> + Send;

    fn announcements_in_category(
        &self,
        category_id: i64,
    ) -> impl Future<Output = Vec<Announcement>> + Send;

    /// Stores a new announcement with `lastUpdate` set to now
    fn create_announcement(
        &self,
        id: i64,
        draft: AnnouncementDraft,
    ) -> impl Future<Output = Result<Announcement>> + Send;

    /// Replaces every field and sets `lastUpdate` to now
    fn update_announcement(
        &self,
        id: i64,
        draft: AnnouncementDraft,
    ) -> impl Future<Output = Result<Announcement>> + Send;

    fn delete_announcement(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
struct StoredAnnouncement {
    id: i64,
    title: String,
    description: String,
    category_ids: BTreeSet<i64>,
    publication_date: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    announcements: BTreeMap<i64, StoredAnnouncement>,
}

impl Tables {
    fn resolve(&self, stored: &StoredAnnouncement) -> Announcement {
        Announcement {
            id: stored.id,
            title: stored.title.clone(),
            description: stored.description.clone(),
            publication_date: stored.publication_date,
            last_update: stored.last_update,
            categories: stored
                .category_ids
                .iter()
                .filter_map(|id| self.categories.get(id).cloned())
                .collect(),
        }
    }

    fn check_categories_exist(&self, ids: &BTreeSet<i64>) -> Result<()> {
        if ids.is_empty() || ids.iter().any(|id| !self.categories.contains_key(id)) {
            return Err(Error::invalid_input("Category does not exist"));
        }
        Ok(())
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

/// In-memory repository guarded by an async read-write lock
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `dataset`
    ///
    /// Category references that do not resolve are dropped.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let categories: BTreeMap<i64, Category> = dataset
            .categories
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let announcements = dataset
            .announcements
            .into_iter()
            .map(|a| {
                let stored = StoredAnnouncement {
                    id: a.id,
                    title: a.title,
                    description: a.description,
                    category_ids: a
                        .categories
                        .iter()
                        .map(|c| c.id)
                        .filter(|id| categories.contains_key(id))
                        .collect(),
                    publication_date: a.publication_date,
                    last_update: a.last_update,
                };
                (stored.id, stored)
            })
            .collect();

        Self {
            tables: RwLock::new(Tables {
                categories,
                announcements,
            }),
        }
    }
}

impl Repository for MemoryRepository {
    async fn categories(&self) -> Vec<Category> {
        self.tables.read().await.categories.values().cloned().collect()
    }

    async fn category(&self, id: i64) -> Result<Category> {
        self.tables
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Category"))
    }

    async fn create_category(&self, category: Category) -> Result<Category> {
        let mut tables = self.tables.write().await;
        if tables.categories.contains_key(&category.id) || tables.name_taken(&category.name, None) {
            return Err(Error::conflict(UNIQUE_VIOLATION));
        }
        tables.categories.insert(category.id, category.clone());
        tracing::info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn rename_category(&self, id: i64, name: String) -> Result<Category> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(Error::not_found("Category"));
        }
        if tables.name_taken(&name, Some(id)) {
            return Err(Error::conflict(UNIQUE_VIOLATION));
        }
        let category = Category::new(id, name);
        tables.categories.insert(id, category.clone());
        tracing::info!(id, name = %category.name, "Category renamed");
        Ok(category)
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(Error::not_found("Category"));
        }
        if tables
            .announcements
            .values()
            .any(|a| a.category_ids.contains(&id))
        {
            return Err(Error::relation_violation());
        }
        tables.categories.remove(&id);
        tracing::info!(id, "Category deleted");
        Ok(())
    }

    async fn announcements(&self) -> Vec<Announcement> {
        let tables = self.tables.read().await;
        tables
            .announcements
            .values()
            .map(|a| tables.resolve(a))
            .collect()
    }

    async fn announcement(&self, id: i64) -> Result<Announcement> {
        let tables = self.tables.read().await;
        tables
            .announcements
            .get(&id)
            .map(|a| tables.resolve(a))
            .ok_or_else(|| Error::not_found("Announcement"))
    }

    async fn announcements_in_category(&self, category_id: i64) -> Vec<Announcement> {
        let tables = self.tables.read().await;
        tables
            .announcements
            .values()
            .filter(|a| a.category_ids.contains(&category_id))
            .map(|a| tables.resolve(a))
            .collect()
    }

    async fn create_announcement(&self, id: i64, draft: AnnouncementDraft) -> Result<Announcement> {
        let mut tables = self.tables.write().await;
        tables.check_categories_exist(&draft.category_ids)?;
        if tables.announcements.contains_key(&id) {
            return Err(Error::conflict(UNIQUE_VIOLATION));
        }

        let stored = StoredAnnouncement {
            id,
            title: draft.title,
            description: draft.description,
            category_ids: draft.category_ids,
            publication_date: draft.publication_date,
            last_update: Utc::now(),
        };
        let announcement = tables.resolve(&stored);
        tables.announcements.insert(id, stored);
        tracing::info!(id, "Announcement created");
        Ok(announcement)
    }

    async fn update_announcement(&self, id: i64, draft: AnnouncementDraft) -> Result<Announcement> {
        let mut tables = self.tables.write().await;
        if !tables.announcements.contains_key(&id) {
            return Err(Error::not_found("Announcement"));
        }
        tables.check_categories_exist(&draft.category_ids)?;

        let stored = StoredAnnouncement {
            id,
            title: draft.title,
            description: draft.description,
            category_ids: draft.category_ids,
            publication_date: draft.publication_date,
            last_update: Utc::now(),
        };
        let announcement = tables.resolve(&stored);
        tables.announcements.insert(id, stored);
        tracing::info!(id, "Announcement updated");
        Ok(announcement)
    }

    async fn delete_announcement(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.announcements.remove(&id).is_none() {
            return Err(Error::not_found("Announcement"));
        }
        tracing::info!(id, "Announcement deleted");
        Ok(())
    }
}
