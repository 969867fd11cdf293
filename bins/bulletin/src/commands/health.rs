//! `bulletin health`

use anyhow::Result;
use bulletin_api_client::BulletinClient;
use bulletin_cli::output::{print_json, Status};
use bulletin_cli::OutputFormat;
use serde_json::json;

/// Ask the configured server whether it is up
pub async fn run(format: OutputFormat) -> Result<()> {
    let client = BulletinClient::new()?;
    let (health, elapsed) = client.health().check_timed().await?;

    if format.is_json() {
        print_json(&json!({
            "url": client.base_url(),
            "status": health.status,
            "responseMs": elapsed.as_millis(),
        }))?;
    } else if health.is_ok() {
        Status::success(&format!("{} is up ({}ms)", client.base_url(), elapsed.as_millis()));
    } else {
        Status::warning(&format!("{} reported status {:?}", client.base_url(), health.status));
    }

    if !health.is_ok() {
        anyhow::bail!("server reported status {:?}", health.status);
    }
    Ok(())
}
