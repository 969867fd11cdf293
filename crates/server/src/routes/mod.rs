//! Route table

mod announcements;
mod categories;
mod system;

pub use announcements::SearchMode;

use crate::middleware::{
    cors_layer, count_requests, preflight_no_content, propagate_request_id, set_request_id,
    trace_layer,
};
use crate::repository::Repository;
use crate::state::AppState;
use crate::ws::ws_handler;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;

/// Build the application router
pub fn router<R: Repository>(state: AppState<R>) -> Router {
    let api = Router::new()
        .route(
            "/categories",
            get(categories::list::<R>).post(categories::create::<R>),
        )
        .route(
            "/categories/{id}",
            get(categories::get::<R>)
                .put(categories::update::<R>)
                .delete(categories::delete::<R>),
        )
        .route(
            "/announcements",
            get(announcements::list::<R>).post(announcements::create::<R>),
        )
        .route("/announcements/search", get(announcements::search::<R>))
        .route(
            "/announcements/category/{category_id}",
            get(announcements::by_category::<R>),
        )
        .route(
            "/announcements/{id}",
            get(announcements::get::<R>)
                .put(announcements::update::<R>)
                .delete(announcements::delete::<R>),
        );

    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics::<R>))
        .route("/ws", get(ws_handler::<R>))
        .nest("/api", api)
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(state.settings.body_limit_bytes))
        .layer(from_fn_with_state(state.clone(), count_requests::<R>))
        .layer(propagate_request_id())
        .layer(trace_layer())
        .layer(set_request_id())
        .layer(cors_layer(&state.settings))
        .layer(from_fn(preflight_no_content))
        .with_state(state)
}
