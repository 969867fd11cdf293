//! `/api/announcements`

use crate::auth::AdminGuard;
use crate::error::ApiResult;
use crate::repository::{AnnouncementDraft, Repository};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bulletin_core::model::{Announcement, AnnouncementInput};
use bulletin_core::validation::{parse_path_id, validate_announcement_input, InputMode};
use bulletin_core::Error;
use bulletin_search::{filter_and_sort, ListingQuery, SortOrder};
use serde::Deserialize;

/// How `/search` interprets `q`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring of title, description, or a category name
    #[default]
    Contains,
    /// Typo-tolerant relevance ranking
    Fuzzy,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    mode: SearchMode,
    /// Only used by fuzzy mode; defaults to relevance
    sort: Option<String>,
}

pub async fn list<R: Repository>(State(state): State<AppState<R>>) -> Json<Vec<Announcement>> {
    Json(state.repo.announcements().await)
}

pub async fn search<R: Repository>(
    State(state): State<AppState<R>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Announcement>>> {
    let Query(params) = params?;
    let all = state.repo.announcements().await;

    let found = match params.mode {
        SearchMode::Contains => contains_search(all, &params.q),
        SearchMode::Fuzzy => {
            let sort = match params.sort.as_deref() {
                Some(raw) => raw
                    .parse::<SortOrder>()
                    .map_err(|e| Error::invalid_input(e.to_string()))?,
                None => SortOrder::Relevance,
            };
            let query = ListingQuery::new().with_search(params.q.as_str()).with_sort(sort);
            filter_and_sort(&all, &query)
                .into_iter()
                .map(|result| result.item.clone())
                .collect()
        }
    };

    tracing::debug!(q = %params.q, mode = ?params.mode, results = found.len(), "Search");
    Ok(Json(found))
}

/// Keep announcements whose title, description, or a category name contains `q`
fn contains_search(announcements: Vec<Announcement>, q: &str) -> Vec<Announcement> {
    let needle = q.to_lowercase();
    announcements
        .into_iter()
        .filter(|a| {
            a.title.to_lowercase().contains(&needle)
                || a.description.to_lowercase().contains(&needle)
                || a.categories.iter().any(|c| c.name.to_lowercase().contains(&needle))
        })
        .collect()
}

pub async fn by_category<R: Repository>(
    State(state): State<AppState<R>>,
    Path(category_id): Path<String>,
) -> ApiResult<Json<Vec<Announcement>>> {
    let category_id = parse_path_id("categoryId", &category_id)?;
    Ok(Json(state.repo.announcements_in_category(category_id).await))
}

pub async fn get<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Announcement>> {
    let id = parse_path_id("id", &id)?;
    Ok(Json(state.repo.announcement(id).await?))
}

pub async fn create<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    body: Result<Json<AnnouncementInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Announcement>)> {
    let Json(input) = body?;
    validate_announcement_input(&input, InputMode::Create).to_result()?;

    let id = input.id.ok_or_else(|| Error::validation("Validation failed: id: Field is required"))?;
    let draft = AnnouncementDraft::from_input(&input)?;
    let announcement = state.repo.create_announcement(id, draft).await?;

    state.metrics.increment("announcements.created");
    state.hub.announcement_created(&announcement);
    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<AnnouncementInput>, JsonRejection>,
) -> ApiResult<Json<Announcement>> {
    let id = parse_path_id("id", &id)?;
    let Json(input) = body?;
    validate_announcement_input(&input, InputMode::Update).to_result()?;

    let draft = AnnouncementDraft::from_input(&input)?;
    Ok(Json(state.repo.update_announcement(id, draft).await?))
}

pub async fn delete<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_path_id("id", &id)?;
    state.repo.delete_announcement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
