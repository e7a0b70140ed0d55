//! casescrape - court case-status scraper.
//!
//! Drives a headless browser through a court's public case-status portal and
//! extracts structured case records with their linked order documents.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casescrape::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "casescrape=info"
    } else {
        "casescrape=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
