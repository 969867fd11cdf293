//! Configuration schema definitions
//!
//! Every section deserializes with defaults so a partial file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin of the web client, echoed in CORS headers
    #[serde(default)]
    pub client_url: Option<String>,

    /// Largest accepted request body
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_url: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4001
}

fn default_body_limit() -> usize {
    10 * 1024
}

/// Admin access configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SecurityConfig {
    /// Shared secret expected in the `x-admin-secret` header
    #[serde(default)]
    pub admin_secret: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Load the default categories and announcements at start-up
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { seed_defaults: true }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level (`RUST_LOG` takes precedence)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.server.port, 4001);
        assert_eq!(schema.server.body_limit_bytes, 10240);
        assert!(schema.storage.seed_defaults);
        assert_eq!(schema.logging.level, "info");
        assert!(schema.security.admin_secret.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [server]
            port = 8080
            client_url = "http://localhost:5173"
            "#,
        )
        .unwrap();

        assert_eq!(schema.server.port, 8080);
        assert_eq!(schema.server.host, "127.0.0.1");
        assert_eq!(schema.server.client_url.as_deref(), Some("http://localhost:5173"));
        assert!(schema.storage.seed_defaults);
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "127.0.0.1:4001");
    }
}
