//! Browser-automation pipeline for the case-status portal.

pub mod browser;
pub mod extract;
pub mod harvest;
pub mod navigator;
pub mod pipeline;

pub use browser::BrowserSession;
pub use extract::extract_records;
pub use navigator::NavigationOutcome;
pub use pipeline::{run_pipeline, ScrapeWorker};
