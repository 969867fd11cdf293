//! Admin access for write routes

use crate::error::ApiError;
use crate::repository::Repository;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use subtle::ConstantTimeEq;

/// Header carrying the shared admin secret
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Compare two byte slices in constant time.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Extractor that only succeeds for requests carrying the admin secret
///
/// Place it before body extractors so unauthorised writes are refused
/// without parsing their payload.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl<R: Repository> FromRequestParts<AppState<R>> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.settings.admin_secret.as_bytes();
        let provided = parts
            .headers
            .get(ADMIN_SECRET_HEADER)
            .map(|value| value.as_bytes())
            .unwrap_or_default();

        if !expected.is_empty() && constant_time_compare(provided, expected) {
            Ok(AdminGuard)
        } else {
            state.metrics.increment("http.admin_rejected");
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                "Rejected admin request"
            );
            Err(ApiError::new(
                StatusCode::FORBIDDEN,
                "Forbidden: invalid x-admin-secret",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_slices() {
        assert!(constant_time_compare(b"hello", b"hello"));
    }

    #[test]
    fn test_different_slices() {
        assert!(!constant_time_compare(b"hello", b"world"));
    }

    #[test]
    fn test_different_lengths() {
        assert!(!constant_time_compare(b"hello", b"hi"));
    }
}
