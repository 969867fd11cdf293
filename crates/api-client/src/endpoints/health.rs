//! Health check endpoint

use crate::client::BulletinClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: BulletinClient,
}

impl HealthApi {
    pub(crate) fn new(client: BulletinClient) -> Self {
        Self { client }
    }

    /// GET /health
    pub async fn check(&self) -> ApiResult<HealthResponse> {
        self.client.get("health").await
    }

    /// Check health and report the round-trip time
    pub async fn check_timed(&self) -> ApiResult<(HealthResponse, Duration)> {
        let start = Instant::now();
        let response = self.check().await?;
        Ok((response, start.elapsed()))
    }
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the server is up
    pub status: String,
}

impl HealthResponse {
    /// Whether the server reported itself healthy
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
