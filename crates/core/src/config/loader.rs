//! Configuration file loading and environment overrides

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path or the standard locations
    ///
    /// An explicit path must exist. Without one, the first candidate file
    /// found is used, and defaults apply when there is none.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load, apply the process environment, and validate
    pub fn from_env(path: Option<&str>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override file values with the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Override file values using `lookup` as the environment
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(port) = read("PORT") {
            self.schema.server.port = port.trim().parse().map_err(|_| {
                Error::new(ErrorCode::ConfigValidationError, format!("Invalid PORT: {}", port))
            })?;
        }
        if let Some(host) = read("BULLETIN_HOST") {
            self.schema.server.host = host;
        }
        if let Some(url) = read("CLIENT_URL") {
            self.schema.server.client_url = Some(url);
        }
        if let Some(secret) = read("ADMIN_SECRET") {
            self.schema.security.admin_secret = Some(secret);
        }
        if let Some(seed) = read("BULLETIN_SEED") {
            self.schema.storage.seed_defaults = parse_flag(&seed).ok_or_else(|| {
                Error::new(
                    ErrorCode::ConfigValidationError,
                    format!("Invalid BULLETIN_SEED: {}", seed),
                )
            })?;
        }
        if let Some(level) = read("BULLETIN_LOG") {
            self.schema.logging.level = level;
        }
        Ok(())
    }

    /// Check that every required value is present
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("CLIENT_URL", self.schema.server.client_url.as_deref()),
            ("ADMIN_SECRET", self.schema.security.admin_secret.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        match missing.as_slice() {
            [] => Ok(()),
            [name] => Err(Error::missing_env(name)),
            names => Err(Error::new(
                ErrorCode::MissingEnvVar,
                format!("Missing required environment variables: {}", names.join(", ")),
            )
            .with_suggestion("Set them in the environment or the configuration file")),
        }
    }

    /// The configured admin secret, or an empty string
    pub fn admin_secret(&self) -> &str {
        self.schema.security.admin_secret.as_deref().unwrap_or_default()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["bulletin.toml", ".bulletin.toml", ".config/bulletin.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path))?;

    let schema: ConfigSchema = toml::from_str(&content)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.server.port, 4001);
    }

    #[test]
    fn test_config_load_explicit_missing_file() {
        let err = Config::load(Some("/definitely/not/here/bulletin.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 5000\n[storage]\nseed_defaults = false").unwrap();

        let path = file.path().to_str().unwrap();
        let config = Config::load(Some(path)).unwrap();

        assert_eq!(config.schema.server.port, 5000);
        assert!(!config.schema.storage.seed_defaults);
        assert_eq!(config.path.as_deref(), Some(path));
    }

    #[test]
    fn test_config_load_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = Config::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_with(env(&[
                ("PORT", "4100"),
                ("CLIENT_URL", "http://localhost:5173"),
                ("ADMIN_SECRET", "s3cret"),
                ("BULLETIN_SEED", "off"),
                ("BULLETIN_LOG", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.schema.server.port, 4100);
        assert_eq!(config.admin_secret(), "s3cret");
        assert!(!config.schema.storage.seed_defaults);
        assert_eq!(config.schema.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = Config::default();
        let err = config.apply_env_with(env(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_validate_names_missing_variable() {
        let mut config = Config::default();
        config
            .apply_env_with(env(&[("CLIENT_URL", "http://localhost:5173")]))
            .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingEnvVar);
        assert_eq!(err.message, "Missing required environment variable: ADMIN_SECRET");
    }

    #[test]
    fn test_validate_lists_all_missing() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.message.contains("CLIENT_URL"));
        assert!(err.message.contains("ADMIN_SECRET"));
    }
}
