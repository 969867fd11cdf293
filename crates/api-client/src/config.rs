//! Configuration for the Bulletin API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Where a locally started server listens by default
pub const DEFAULT_API_URL: &str = "http://localhost:4001";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Exponential backoff between attempts of an idempotent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    #[serde(with = "duration_secs")]
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    #[serde(with = "duration_secs")]
    pub max_delay: Duration,
    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Short delays for local tooling
    #[must_use]
    pub fn quick() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
        }
    }

    /// Delay to wait before `attempt` (0-based; the first attempt never waits)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:4001`
    pub base_url: String,
    /// Sent as `x-admin-secret` on every request when set
    pub admin_secret: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry policy for idempotent requests
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            admin_secret: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `BULLETIN_API_URL`: server root (default `http://localhost:4001`)
    /// - `BULLETIN_ADMIN_SECRET`: admin secret for write requests
    /// - `BULLETIN_TIMEOUT_SECS`: request timeout in seconds (default 30)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_env_with(|name| env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable lookup
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("BULLETIN_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        config.admin_secret = lookup("BULLETIN_ADMIN_SECRET").filter(|v| !v.is_empty());

        if let Some(raw) = lookup("BULLETIN_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::config(format!(
                    "BULLETIN_TIMEOUT_SECS must be a whole number, got {raw:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the admin secret
    #[must_use]
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "{} (must start with http:// or https://)",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }

    /// Notification socket address derived from the base URL
    ///
    /// `http` becomes `ws` and `https` becomes `wss`.
    #[must_use]
    pub fn ws_url(&self) -> String {
        let root = self.base_url.trim_end_matches('/');
        let root = if let Some(rest) = root.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = root.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            root.to_string()
        };
        format!("{root}/ws")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:4001");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.admin_secret.is_none());
    }

    #[test]
    fn test_from_env_overrides() {
        let config = ClientConfig::from_env_with(lookup(&[
            ("BULLETIN_API_URL", "https://board.example.org"),
            ("BULLETIN_ADMIN_SECRET", "s3cret"),
            ("BULLETIN_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://board.example.org");
        assert_eq!(config.admin_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        let err =
            ClientConfig::from_env_with(lookup(&[("BULLETIN_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("BULLETIN_TIMEOUT_SECS"));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(matches!(
            ClientConfig::default().with_base_url("ftp://x").validate(),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_ws_url() {
        assert_eq!(ClientConfig::default().ws_url(), "ws://localhost:4001/ws");
        let secure = ClientConfig::default().with_base_url("https://board.example.org/");
        assert_eq!(secure.ws_url(), "wss://board.example.org/ws");
    }

    #[test]
    fn test_retry_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(5));
    }
}
