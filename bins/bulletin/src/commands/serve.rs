//! `bulletin serve`

use anyhow::Result;
use bulletin_core::config::Config;
use bulletin_telemetry::TelemetryConfig;
use std::path::Path;

/// Load configuration, set up logging, and run the server until shutdown
pub async fn run(config_path: Option<&Path>, port: Option<u16>, verbose: bool) -> Result<()> {
    let path = config_path.map(|p| p.to_string_lossy().into_owned());

    let mut config = Config::load(path.as_deref())?;
    config.apply_env()?;
    if let Some(port) = port {
        config.schema.server.port = port;
    }
    config.validate()?;

    let logging = &config.schema.logging;
    let level = if verbose { "debug" } else { logging.level.as_str() };
    bulletin_telemetry::init_with_config(TelemetryConfig::new(level).with_json(logging.json))?;

    if let Some(ref file) = config.path {
        tracing::info!(config = %file, "Loaded configuration file");
    }

    bulletin_server::run(&config).await?;
    Ok(())
}
