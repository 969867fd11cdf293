//! `bulletin search`

use anyhow::{Context, Result};
use bulletin_api_client::{BulletinClient, Feed};
use bulletin_cli::output::{announcement_line, format_count, print_json, Status};
use bulletin_cli::{progress, OutputFormat};
use bulletin_core::seed::default_dataset;
use bulletin_search::{ListingQuery, SortOrder};
use serde_json::json;

/// Options for one listing search
pub struct SearchArgs {
    pub query: String,
    pub categories: Vec<String>,
    pub sort: Option<String>,
    pub offline: bool,
}

impl SearchArgs {
    fn listing_query(&self) -> Result<ListingQuery> {
        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortOrder>().with_context(|| {
                let names: Vec<&str> = SortOrder::ALL.iter().map(SortOrder::as_str).collect();
                format!("expected one of: {}", names.join(", "))
            })?,
            None => SortOrder::default(),
        };

        let mut query = ListingQuery::new().with_search(self.query.as_str()).with_sort(sort);
        for name in &self.categories {
            query = query.with_category(name.as_str());
        }
        Ok(query)
    }
}

/// Filter and print the listing
pub async fn run(args: &SearchArgs, format: OutputFormat) -> Result<()> {
    let query = args.listing_query()?;
    let mut feed = Feed::new(default_dataset().announcements);

    if !args.offline {
        let client = BulletinClient::new()?;
        let pb = (!format.is_json()).then(|| progress::spinner("Loading announcements..."));
        let refreshed = feed.refresh(&client).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        if let Err(e) = refreshed {
            Status::warning(&format!("Server unavailable ({e}); showing built-in announcements"));
        }
    }

    let results = feed.view(&query);

    if format.is_json() {
        return Ok(print_json(&json!({
            "source": if feed.is_fallback() { "fallback" } else { "server" },
            "sort": query.sort,
            "results": results,
        }))?);
    }

    if results.is_empty() {
        Status::info("No announcements match");
        return Ok(());
    }

    Status::header(&format!(
        "{} ({})",
        format_count(results.len(), "announcement", "announcements"),
        query.sort
    ));
    for result in &results {
        println!("{}", announcement_line(result.item));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sort: Option<&str>) -> SearchArgs {
        SearchArgs {
            query: "helth".to_string(),
            categories: vec!["Health".to_string()],
            sort: sort.map(str::to_string),
            offline: true,
        }
    }

    #[test]
    fn test_listing_query_defaults_to_newest_first() {
        let query = args(None).listing_query().unwrap();
        assert_eq!(query.sort, SortOrder::PublicationDateDesc);
        assert_eq!(query.categories, vec!["Health".to_string()]);
        assert_eq!(query.search, "helth");
    }

    #[test]
    fn test_listing_query_accepts_camel_case_sort() {
        let query = args(Some("titleAsc")).listing_query().unwrap();
        assert_eq!(query.sort, SortOrder::TitleAsc);
    }

    #[test]
    fn test_listing_query_rejects_unknown_sort() {
        let err = args(Some("sideways")).listing_query().unwrap_err();
        assert!(format!("{err:#}").contains("publication-date-desc"));
    }
}
