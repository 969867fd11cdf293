//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AnnouncementsApi, CategoriesApi, HealthApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Header carrying the admin secret on write requests
const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Bulletin API client
///
/// Wraps `reqwest` and adds:
/// - Retry with exponential backoff for idempotent requests
/// - Request correlation IDs for tracing
/// - The admin secret header when one is configured
#[derive(Clone)]
pub struct BulletinClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl BulletinClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("bulletin-api-client/1.0"));

        if let Some(ref secret) = config.admin_secret {
            let value = HeaderValue::from_str(secret).map_err(|_| {
                ApiError::config("admin secret contains characters not allowed in a header")
            })?;
            default_headers.insert(ADMIN_SECRET_HEADER, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access category endpoints
    #[must_use]
    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.clone())
    }

    /// Access announcement endpoints
    #[must_use]
    pub fn announcements(&self) -> AnnouncementsApi {
        AnnouncementsApi::new(self.clone())
    }

    /// Access the health endpoint
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(Method::GET, path, &[], Option::<&()>::None).await?;
        Ok(response.json().await?)
    }

    /// Perform a GET request with URL-encoded query parameters
    #[instrument(skip(self))]
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let response = self.send(Method::GET, path, query, Option::<&()>::None).await?;
        Ok(response.json().await?)
    }

    /// Perform a POST request
    #[instrument(skip(self, body))]
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Perform a PUT request
    #[instrument(skip(self, body))]
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self.send(Method::PUT, path, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Perform a DELETE request; the server answers with an empty body
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self.send(Method::DELETE, path, &[], Option::<&()>::None).await?;
        if response.status() != StatusCode::NO_CONTENT {
            debug!(status = response.status().as_u16(), "Unexpected DELETE status");
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request, retrying idempotent methods on transient failures
    ///
    /// POST is never retried: a create that timed out may still have been
    /// applied.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let url = self.url(path);
        let request_id = Uuid::new_v4().to_string();
        let max_attempts = if method == Method::POST {
            1
        } else {
            self.config.retry.max_attempts
        };

        let mut last_error: Option<ApiError> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.config.retry.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self.send_once(&request_id, method.clone(), &url, query, body).await;
            let elapsed = start.elapsed();

            match result {
                Ok(response) => {
                    debug!(
                        request_id = %request_id,
                        %method,
                        %url,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    if attempt > 0 && e.is_retryable() {
                        return Err(ApiError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                        });
                    }
                    debug!(request_id = %request_id, error = %e, "Request failed");
                    return Err(e);
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    async fn send_once<B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let mut request = self.inner.request(method, url).header(X_REQUEST_ID, request_id);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BulletinClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_joining() {
        let client = BulletinClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:4001/"),
        )
        .unwrap();
        assert_eq!(client.url("/api/categories"), "http://localhost:4001/api/categories");
        assert_eq!(client.url("health"), "http://localhost:4001/health");
    }

    #[test]
    fn test_rejects_unprintable_secret() {
        let config = ClientConfig::default().with_admin_secret("bad\nsecret");
        assert!(matches!(BulletinClient::with_config(config), Err(ApiError::Config(_))));
    }
}
