//! Bulletin - community announcement board
//!
//! Runs the API server and talks to a running one from the terminal.

use bulletin_cli::OutputFormat;
use bulletin_core::error::exit_codes;
use bulletin_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{categories, health, search, seed, serve};

/// Community announcement board: server and command-line client
#[derive(Parser)]
#[command(name = "bulletin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Configuration file (defaults to bulletin.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding PORT and the configuration file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search the announcement listing
    Search {
        /// Free-text query, typos allowed
        query: Option<String>,

        /// Only show announcements in this category (repeatable)
        #[arg(short, long = "category", value_name = "NAME")]
        categories: Vec<String>,

        /// Sort order, e.g. publication-date-desc, title-asc, relevance
        #[arg(short, long)]
        sort: Option<String>,

        /// Use the built-in announcements instead of the server
        #[arg(long)]
        offline: bool,
    },

    /// Rank category names for a picker query
    Categories {
        /// Query to rank against; lists everything alphabetically when omitted
        query: Option<String>,

        /// Leave out an already selected category (repeatable)
        #[arg(short, long, value_name = "NAME")]
        exclude: Vec<String>,

        /// Use the built-in categories instead of the server
        #[arg(long)]
        offline: bool,
    },

    /// Upload the default categories and announcements
    Seed,

    /// Check that the server is up
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The server sets up logging from its own configuration
    if !matches!(cli.command, Commands::Serve { .. }) {
        let level = if cli.verbose { "debug" } else { "warn" };
        if let Err(e) = bulletin_telemetry::init_with_config(TelemetryConfig::new(level)) {
            eprintln!("{} {}", "Warning:".yellow(), e);
        }
    }

    let result = match cli.command {
        Commands::Serve { config, port } => serve::run(config.as_deref(), port, cli.verbose).await,

        Commands::Search {
            query,
            categories,
            sort,
            offline,
        } => {
            let args = search::SearchArgs {
                query: query.unwrap_or_default(),
                categories,
                sort,
                offline,
            };
            search::run(&args, cli.format).await
        }

        Commands::Categories {
            query,
            exclude,
            offline,
        } => {
            let query = query.as_deref().unwrap_or_default();
            categories::run(query, &exclude, offline, cli.format).await
        }

        Commands::Seed => seed::run(cli.format).await,

        Commands::Health => health::run(cli.format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Configuration and validation failures get their own exit codes
fn exit_code_for(error: &anyhow::Error) -> u8 {
    let code = error
        .downcast_ref::<bulletin_core::Error>()
        .map_or(exit_codes::FAILURE, bulletin_core::Error::exit_code);
    u8::try_from(code).unwrap_or(1)
}
