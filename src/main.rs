//! housepix command-line entry point
//!
//! Fetches the configured number of listing pages and downloads every
//! listing's photo. Exit codes distinguish the outcome classes:
//! - 0: all fetched listings had their photos saved
//! - 1: fatal setup failure (bad arguments, client build failure)
//! - 2: the fetch produced zero listings
//! - 3: one or more photos could not be downloaded or saved

use clap::Parser;
use housepix::{Config, RetryingClient, fetch_houses, process_images};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fetch real-estate listings and download their photos
#[derive(Parser, Debug)]
#[command(name = "housepix")]
#[command(version)]
#[command(about = "Fetch real-estate listings and download their photos", long_about = None)]
struct Cli {
    /// Number of listing pages to fetch
    #[arg(long, default_value_t = 10)]
    pages: u32,

    /// Listings requested per page
    #[arg(long, default_value_t = 10)]
    per_page: u32,

    /// Base URL of the listing API
    #[arg(long)]
    base_url: Option<String>,

    /// Directory to save photos into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number of concurrent image download workers
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let mut config = Config {
        total_pages: cli.pages,
        per_page: cli.per_page,
        download_dir: cli.output,
        image_workers: cli.workers,
        ..Config::default()
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let client = match RetryingClient::new(config.retry.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::from(1);
        }
    };

    tracing::info!(
        pages = config.total_pages,
        per_page = config.per_page,
        "Fetching listings"
    );
    let outcome = match fetch_houses(&client, &config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Listing fetch failed");
            return ExitCode::from(1);
        }
    };
    for failure in &outcome.failed_pages {
        tracing::error!(page = failure.page, error = %failure.error, "Page contributed no listings");
    }
    if outcome.houses.is_empty() {
        tracing::error!("No listings fetched");
        return ExitCode::from(2);
    }

    let report = match process_images(&client, &outcome.houses, &config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Image pipeline failed");
            return ExitCode::from(1);
        }
    };

    tracing::info!(saved = report.saved, failed = report.failed, "Done");
    if report.failed > 0 {
        return ExitCode::from(3);
    }
    ExitCode::SUCCESS
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("housepix=info,warn"),
            1 => EnvFilter::new("housepix=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
