//! Shared handler state

use crate::notify::NotificationHub;
use crate::repository::Repository;
use axum::http::HeaderValue;
use bulletin_core::config::Config;
use bulletin_core::{Error, Result};
use bulletin_telemetry::MetricsRegistry;
use std::sync::Arc;

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Expected `x-admin-secret` value
    pub admin_secret: String,
    /// Origin allowed by CORS
    pub client_origin: HeaderValue,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl ServerSettings {
    /// Settings from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let origin = config.schema.server.client_url.as_deref().unwrap_or_default();
        let client_origin = HeaderValue::from_str(origin.trim_end_matches('/'))
            .map_err(|_| Error::config(format!("Invalid CLIENT_URL: {}", origin)))?;

        Ok(Self {
            admin_secret: config.admin_secret().to_string(),
            client_origin,
            body_limit_bytes: config.schema.server.body_limit_bytes,
        })
    }
}

/// State cloned into every handler
pub struct AppState<R> {
    pub repo: Arc<R>,
    pub hub: NotificationHub,
    pub metrics: Arc<MetricsRegistry>,
    pub settings: Arc<ServerSettings>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            hub: self.hub.clone(),
            metrics: Arc::clone(&self.metrics),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<R: Repository> AppState<R> {
    pub fn new(repo: R, settings: ServerSettings) -> Self {
        Self {
            repo: Arc::new(repo),
            hub: NotificationHub::new(),
            metrics: Arc::new(MetricsRegistry::new()),
            settings: Arc::new(settings),
        }
    }
}
