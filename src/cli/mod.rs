//! Operator CLI.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;

use crate::catalog::CatalogCache;
use crate::config::ScraperConfig;
use crate::models::{CaseQuery, CaseRecord};
use crate::scrapers::ScrapeWorker;

#[derive(Parser)]
#[command(name = "casescrape")]
#[command(about = "Court case-status scraper")]
#[command(version)]
pub struct Cli {
    /// Portal URL (defaults to the Delhi High Court case-status page)
    #[arg(long, global = true, env = "CASESCRAPE_PORTAL_URL")]
    portal_url: Option<String>,

    /// Run the browser with a visible window (for debugging)
    #[arg(long, global = true)]
    headed: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search the portal for a case and print the extracted records
    Search {
        /// Case type, exactly as listed in the portal dropdown
        #[arg(long)]
        case_type: String,
        /// Case number
        #[arg(long)]
        case_number: String,
        /// Filing year
        #[arg(long)]
        filing_year: String,
    },

    /// Print the portal's case-type catalog
    CaseTypes,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ScraperConfig::default();
    if let Some(url) = cli.portal_url {
        config.portal_url = url;
    }
    if cli.headed {
        config.headless = false;
    }

    match cli.command {
        Commands::Search {
            case_type,
            case_number,
            filing_year,
        } => {
            let catalog = Arc::new(CatalogCache::new());
            let worker = ScrapeWorker::spawn(config, catalog);
            let records = worker
                .submit(CaseQuery::new(case_type, case_number, filing_year))
                .await;

            if records.is_empty() {
                println!("{}", style("No data found").yellow());
            } else {
                println!("{}", serde_json::to_string_pretty(&display_records(&records))?);
            }
        }

        Commands::CaseTypes => {
            let catalog = CatalogCache::new();
            let snapshot = catalog.get_or_fetch(&config).await?;
            if snapshot.case_types.is_empty() {
                println!("{}", style("No case types found").yellow());
            }
            for case_type in &snapshot.case_types {
                println!("{}", case_type);
            }
        }
    }

    Ok(())
}

/// Display subset of a record: everything except the raw catalog markup,
/// which is for the persistence collaborator, not the terminal.
fn display_records(records: &[CaseRecord]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|r| {
            serde_json::json!({
                "case_info": r.case_info,
                "parties": r.parties,
                "listing_date_court": r.listing_date_court,
                "petitioner": r.petitioner,
                "respondent": r.respondent,
                "last_hearing": r.last_hearing,
                "next_hearing": r.next_hearing,
                "latest_order_url": r.latest_order_url,
                "documents": r.documents,
            })
        })
        .collect()
}
