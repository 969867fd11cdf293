//! Service endpoints outside `/api`

use crate::error::ApiError;
use crate::repository::Repository;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn metrics<R: Repository>(State(state): State<AppState<R>>) -> Json<Value> {
    state
        .metrics
        .gauge("ws.open", state.hub.connection_count() as u64);
    Json(state.metrics.export_json())
}

pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}
