//! Error taxonomy for the extraction pipeline.
//!
//! Only failures that abort the current request are modeled as errors.
//! Recoverable conditions (page-load timeout, blocked submission) are
//! [`NavigationOutcome`](crate::scrapers::NavigationOutcome) variants; a
//! missing CAPTCHA element or an empty document listing is logged and the
//! pipeline continues.

use thiserror::Error;

/// Failures surfaced by the scraping pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser process could not be started. Fatal to the current
    /// request only; the caller surfaces it as "no data found".
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// A CDP-level browser interaction failed.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// The auxiliary tab never appeared after `window.open`. Aborts the
    /// current request.
    #[error("auxiliary tab did not open within bound for {url}")]
    TabOpenTimeout { url: String },

    /// The static catalog fetch failed.
    #[error("catalog fetch failed: {0}")]
    CatalogFetch(#[from] reqwest::Error),
}
