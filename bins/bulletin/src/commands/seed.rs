//! `bulletin seed`

use anyhow::{bail, Result};
use bulletin_api_client::{ApiResult, BulletinClient};
use bulletin_cli::output::{format_count, format_duration, print_json, Status};
use bulletin_cli::{progress, OutputFormat};
use bulletin_core::model::AnnouncementInput;
use bulletin_core::seed::default_dataset;
use serde::Serialize;
use std::time::Instant;

/// What happened to one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedSummary {
    created: usize,
    updated: usize,
    failed: Vec<String>,
}

impl SeedSummary {
    fn record(&mut self, label: String, outcome: ApiResult<Outcome>) {
        match outcome {
            Ok(Outcome::Created) => self.created += 1,
            Ok(Outcome::Updated) => self.updated += 1,
            Err(e) => {
                tracing::warn!(record = %label, error = %e, "Seeding failed");
                self.failed.push(format!("{label}: {e}"));
            }
        }
    }
}

/// Create a record, or update it when one with the same id exists
async fn upsert<C, U>(create: C, update: U) -> ApiResult<Outcome>
where
    C: std::future::Future<Output = ApiResult<()>>,
    U: std::future::Future<Output = ApiResult<()>>,
{
    match create.await {
        Ok(()) => Ok(Outcome::Created),
        Err(e) if e.is_conflict() => update.await.map(|()| Outcome::Updated),
        Err(e) => Err(e),
    }
}

/// Upload the default dataset through the API
///
/// Categories go first so announcements can reference them.
pub async fn run(format: OutputFormat) -> Result<()> {
    let client = BulletinClient::new()?;
    if client.config().admin_secret.is_none() {
        bail!("BULLETIN_ADMIN_SECRET must be set to seed the server");
    }

    let dataset = default_dataset();
    let total = dataset.categories.len() + dataset.announcements.len();
    let start = Instant::now();
    let pb = if format.is_json() {
        progress::hidden()
    } else {
        progress::progress_bar(total as u64, "Seeding")
    };

    let mut summary = SeedSummary::default();

    for category in &dataset.categories {
        let api = client.categories();
        let outcome = upsert(
            async { api.create(category).await.map(drop) },
            async { api.update(category.id, &category.name).await.map(drop) },
        )
        .await;
        summary.record(format!("category {}", category.id), outcome);
        pb.inc(1);
    }

    for announcement in &dataset.announcements {
        let api = client.announcements();
        let input = AnnouncementInput::from(announcement);
        let outcome = upsert(
            async { api.create(&input).await.map(drop) },
            async { api.update(announcement.id, &input).await.map(drop) },
        )
        .await;
        summary.record(format!("announcement {}", announcement.id), outcome);
        pb.inc(1);
    }

    if summary.failed.is_empty() {
        progress::finish_success(&pb, "done");
    } else {
        progress::finish_error(&pb, "finished with errors");
    }

    if format.is_json() {
        print_json(&summary)?;
    } else {
        Status::success(&format!(
            "{} created, {} updated in {}",
            format_count(summary.created, "record", "records"),
            summary.updated,
            format_duration(start.elapsed())
        ));
        for failure in &summary.failed {
            Status::error(failure);
        }
    }

    if !summary.failed.is_empty() {
        bail!("{} could not be seeded", format_count(summary.failed.len(), "record", "records"));
    }
    Ok(())
}
