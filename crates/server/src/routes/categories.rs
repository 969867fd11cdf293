//! `/api/categories`

use crate::auth::AdminGuard;
use crate::error::ApiResult;
use crate::repository::Repository;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bulletin_core::model::{Category, CategoryInput};
use bulletin_core::validation::{parse_path_id, validate_category_input, InputMode};
use bulletin_core::Error;

pub async fn list<R: Repository>(State(state): State<AppState<R>>) -> Json<Vec<Category>> {
    Json(state.repo.categories().await)
}

pub async fn get<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_path_id("id", &id)?;
    Ok(Json(state.repo.category(id).await?))
}

pub async fn create<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = body?;
    validate_category_input(&input, InputMode::Create).to_result()?;

    let id = input.id.ok_or_else(|| Error::validation("Validation failed: id: Field is required"))?;
    let category = state
        .repo
        .create_category(Category::new(id, input.name.trim()))
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let id = parse_path_id("id", &id)?;
    let Json(input) = body?;
    validate_category_input(&input, InputMode::Update).to_result()?;

    let category = state
        .repo
        .rename_category(id, input.name.trim().to_string())
        .await?;
    Ok(Json(category))
}

pub async fn delete<R: Repository>(
    _admin: AdminGuard,
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_path_id("id", &id)?;
    state.repo.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
