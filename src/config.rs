//! Scraper configuration.
//!
//! Every wait bound the pipeline uses lives here rather than as a
//! hard-coded constant, so deployments can tune them to the portal's
//! observed latency.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default portal: Delhi High Court case-status page. Used for both the
/// static catalog fetch and the dynamic search workflow.
pub const DEFAULT_PORTAL_URL: &str = "https://delhihighcourt.nic.in/app/get-case-type-status";

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Portal URL for both the catalog fetch and the search workflow.
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Run the browser in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// User agent for the catalog fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Upper bound for the portal page to report document-ready, in seconds.
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Settle delay after scrolling the submit control into view, in
    /// milliseconds. No DOM signal marks the end of the scroll animation,
    /// so this one stays a delay.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Upper bound for the results table to render after submit, in seconds.
    /// Elapsing is not an error; extraction proceeds on whatever is present.
    #[serde(default = "default_results_timeout_secs")]
    pub results_timeout_secs: u64,

    /// Upper bound for the auxiliary tab to appear after `window.open`, in
    /// seconds. Elapsing aborts the current request.
    #[serde(default = "default_tab_open_timeout_secs")]
    pub tab_open_timeout_secs: u64,

    /// Upper bound for document links to render in the auxiliary tab, in
    /// seconds. Elapsing yields an empty document list.
    #[serde(default = "default_document_wait_timeout_secs")]
    pub document_wait_timeout_secs: u64,

    /// Polling interval for condition waits, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_page_load_timeout_secs() -> u64 {
    20
}

fn default_scroll_settle_ms() -> u64 {
    500
}

fn default_results_timeout_secs() -> u64 {
    3
}

fn default_tab_open_timeout_secs() -> u64 {
    5
}

fn default_document_wait_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            chrome_args: Vec::new(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            scroll_settle_ms: default_scroll_settle_ms(),
            results_timeout_secs: default_results_timeout_secs(),
            tab_open_timeout_secs: default_tab_open_timeout_secs(),
            document_wait_timeout_secs: default_document_wait_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ScraperConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    pub fn tab_open_timeout(&self) -> Duration {
        Duration::from_secs(self.tab_open_timeout_secs)
    }

    pub fn document_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.document_wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_portal_bounds() {
        let config = ScraperConfig::default();
        assert_eq!(config.page_load_timeout(), Duration::from_secs(20));
        assert_eq!(config.scroll_settle(), Duration::from_millis(500));
        assert_eq!(config.tab_open_timeout(), Duration::from_secs(5));
        assert_eq!(config.document_wait_timeout(), Duration::from_secs(10));
        assert!(config.headless);
        assert_eq!(config.portal_url, DEFAULT_PORTAL_URL);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: ScraperConfig =
            serde_json::from_str(r#"{"headless": false, "results_timeout_secs": 8}"#)
                .expect("valid config json");
        assert!(!config.headless);
        assert_eq!(config.results_timeout(), Duration::from_secs(8));
        assert_eq!(config.page_load_timeout(), Duration::from_secs(20));
    }
}
