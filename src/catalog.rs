//! Case-type catalog fetcher.
//!
//! One-shot, browser-free extraction of the search form's case-type
//! dropdown from a plain HTTP fetch of the portal page. The result is
//! cached process-wide with an explicit lifecycle: fetch once via
//! [`CatalogCache::get_or_fetch`], re-fetch on demand via
//! [`CatalogCache::refresh`]. Concurrent refreshes race harmlessly (last
//! writer wins, idempotent content).

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;

/// One fetched catalog: the dropdown labels plus the raw page markup, which
/// the pipeline stamps onto every extracted record.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub case_types: Vec<String>,
    pub raw_html: String,
    pub fetched_at: DateTime<Utc>,
}

/// Process-wide catalog cache.
#[derive(Debug, Default)]
pub struct CatalogCache {
    inner: RwLock<Option<CatalogSnapshot>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, fetching it first if the cache is cold.
    pub async fn get_or_fetch(
        &self,
        config: &ScraperConfig,
    ) -> Result<CatalogSnapshot, ScrapeError> {
        if let Some(snapshot) = self.inner.read().await.as_ref() {
            return Ok(snapshot.clone());
        }
        self.refresh(config).await
    }

    /// Fetch the portal page and replace the cached snapshot. Fetch errors
    /// propagate; the previous snapshot (if any) is left in place.
    pub async fn refresh(&self, config: &ScraperConfig) -> Result<CatalogSnapshot, ScrapeError> {
        let snapshot = fetch_catalog(config).await?;
        *self.inner.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }
}

/// Fetch the portal page and parse its case-type dropdown.
async fn fetch_catalog(config: &ScraperConfig) -> Result<CatalogSnapshot, ScrapeError> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;

    let raw_html = client
        .get(&config.portal_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let case_types = parse_case_types(&raw_html);
    info!(count = case_types.len(), "fetched case-type catalog");

    Ok(CatalogSnapshot {
        case_types,
        raw_html,
        fetched_at: Utc::now(),
    })
}

/// Extract the trimmed label of every `#case_type` option that carries a
/// non-empty `value` attribute. Placeholder options (empty value) are
/// dropped.
pub fn parse_case_types(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("#case_type option").expect("static selector");

    document
        .select(&selector)
        .filter(|opt| {
            opt.value()
                .attr("value")
                .is_some_and(|v| !v.trim().is_empty())
        })
        .map(|opt| opt.text().collect::<String>().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_PAGE: &str = r#"
        <html><body>
          <select id="case_type">
            <option value="">Select Case Type</option>
            <option value="WP(C)">  W.P.(C)  </option>
            <option value="CRL">CRL.A.</option>
            <option value="   ">Blank Value</option>
            <option>No Value</option>
          </select>
        </body></html>
    "#;

    #[test]
    fn keeps_only_options_with_nonempty_value() {
        let types = parse_case_types(FORM_PAGE);
        assert_eq!(types, vec!["W.P.(C)", "CRL.A."]);
    }

    #[test]
    fn empty_dropdown_yields_empty_catalog() {
        assert!(parse_case_types("<html><body></body></html>").is_empty());
    }

    #[tokio::test]
    async fn cold_cache_has_no_snapshot() {
        let cache = CatalogCache::new();
        assert!(cache.inner.read().await.is_none());
    }
}
