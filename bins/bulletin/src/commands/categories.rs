//! `bulletin categories`

use anyhow::Result;
use bulletin_api_client::BulletinClient;
use bulletin_cli::output::{print_json, Status};
use bulletin_cli::OutputFormat;
use bulletin_core::seed::default_categories;
use bulletin_search::{compare_labels, rank_options};

/// Names offered by a picker: everything not yet selected, ranked for `query`
pub fn picker_options(mut names: Vec<String>, query: &str, exclude: &[String]) -> Vec<String> {
    names.retain(|name| !exclude.contains(name));
    names.sort_by(|a, b| compare_labels(a, b));
    rank_options(names, query)
}

/// Print category names ranked for `query`
pub async fn run(
    query: &str,
    exclude: &[String],
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    let builtin = || default_categories().into_iter().map(|c| c.name).collect::<Vec<_>>();

    let names = if offline {
        builtin()
    } else {
        let client = BulletinClient::new()?;
        match client.categories().names().await {
            Ok(names) => names,
            Err(e) => {
                Status::warning(&format!("Server unavailable ({e}); using built-in categories"));
                builtin()
            }
        }
    };

    let ranked = picker_options(names, query, exclude);

    if format.is_json() {
        print_json(&ranked)?;
    } else {
        for name in &ranked {
            println!("{name}");
        }
    }
    Ok(())
}
