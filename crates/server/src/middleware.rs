//! Cross-cutting request handling: CORS, request ids, tracing and metrics

use crate::repository::Repository;
use crate::state::{AppState, ServerSettings};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{HttpMakeClassifier, TraceLayer};
use tracing::Span;

/// Correlation header, echoed back or generated
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Allow the configured client origin with the methods and headers the API uses
pub fn cors_layer(settings: &ServerSettings) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(settings.client_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_SECRET_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Answer preflight requests with 204 instead of an empty 200
///
/// Must sit outside [`cors_layer`], which answers `OPTIONS` itself.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Generate an `x-request-id` for requests that arrive without one
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Echo the request's `x-request-id` on the response
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Request span carrying the method, path and correlation id
pub fn trace_layer() -> TraceLayer<HttpMakeClassifier, fn(&Request<Body>) -> Span> {
    TraceLayer::new_for_http().make_span_with(request_span as fn(&Request<Body>) -> Span)
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id
    )
}

/// Count and time every request
pub async fn count_requests<R: Repository>(
    State(state): State<AppState<R>>,
    request: Request,
    next: Next,
) -> Response {
    let timer = state.metrics.start_timer("http.request_ms");
    let response = next.run(request).await;
    timer.stop();

    state.metrics.increment("http.requests");
    state
        .metrics
        .increment(&format!("http.responses.{}xx", response.status().as_u16() / 100));
    response
}
