//! Auxiliary-tab document harvester.
//!
//! Opens a case's order page in a second browsing context via a
//! script-level `window.open`, collects every anchor whose target contains
//! `.pdf` (case-insensitive), then closes the context and restores focus to
//! the origin page. The restoration is unconditional: it runs whether or
//! not documents were found and whether or not collection failed, so the
//! context count ends where it started.

use std::collections::HashSet;

use chromiumoxide::Page;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::scrapers::BrowserSession;

/// Collect document URLs linked from `url`.
///
/// The auxiliary tab failing to appear within bound is a hard error for the
/// current request ([`ScrapeError::TabOpenTimeout`]). A tab that opens but
/// never renders a document link yields an empty list, which is valid.
pub async fn harvest(
    session: &BrowserSession,
    origin: &Page,
    url: &str,
    config: &ScraperConfig,
) -> Result<Vec<String>, ScrapeError> {
    let browser = session.browser();

    let before: HashSet<_> = browser
        .pages()
        .await?
        .iter()
        .map(|p| p.target_id().clone())
        .collect();

    // Script-level open, not a user click; the order link target is already
    // resolved.
    let quoted = serde_json::to_string(url).unwrap_or_else(|_| format!("'{}'", url));
    origin
        .evaluate(format!("window.open({}, '_blank');", quoted))
        .await?;

    // Wait until the context count increases
    let wait_for_tab = async {
        loop {
            if let Ok(pages) = browser.pages().await {
                if pages.len() > before.len() {
                    return pages;
                }
            }
            tokio::time::sleep(config.poll_interval()).await;
        }
    };
    let pages = tokio::time::timeout(config.tab_open_timeout(), wait_for_tab)
        .await
        .map_err(|_| ScrapeError::TabOpenTimeout {
            url: url.to_string(),
        })?;

    let Some(aux) = pages
        .into_iter()
        .find(|p| !before.contains(p.target_id()))
    else {
        return Err(ScrapeError::TabOpenTimeout {
            url: url.to_string(),
        });
    };

    let documents = collect_pdf_links(&aux, config).await;

    // Close the auxiliary tab and restore focus on every path from here on
    if let Err(e) = aux.close().await {
        warn!("failed to close auxiliary tab: {}", e);
    }
    if let Err(e) = origin.bring_to_front().await {
        warn!("failed to restore focus to origin tab: {}", e);
    }

    Ok(documents)
}

/// Wait for document links to render in the auxiliary tab and collect their
/// targets. A timeout is not an error; it just means no documents.
async fn collect_pdf_links(page: &Page, config: &ScraperConfig) -> Vec<String> {
    let poll = async {
        loop {
            if let Ok(anchors) = page.find_elements("a").await {
                let mut hrefs = Vec::new();
                for anchor in anchors {
                    if let Ok(Some(href)) = anchor.attribute("href").await {
                        hrefs.push(href);
                    }
                }
                let documents = filter_pdf_urls(hrefs);
                if !documents.is_empty() {
                    return documents;
                }
            }
            tokio::time::sleep(config.poll_interval()).await;
        }
    };

    match tokio::time::timeout(config.document_wait_timeout(), poll).await {
        Ok(documents) => {
            info!(count = documents.len(), "collected document links");
            documents
        }
        Err(_) => {
            info!("no documents found in auxiliary tab");
            Vec::new()
        }
    }
}

/// Keep only URLs that case-insensitively contain `.pdf`.
fn filter_pdf_urls(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    urls.into_iter()
        .filter(|u| u.to_lowercase().contains(".pdf"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_pdf_targets_case_insensitively() {
        // Scenario B's filter property: 3 pdf links and 1 other resolve to
        // exactly 3 entries.
        let urls = vec![
            "https://court.example/orders/a.pdf".to_string(),
            "https://court.example/orders/B.PDF".to_string(),
            "https://court.example/orders/c.Pdf?dl=1".to_string(),
            "https://court.example/orders/index.html".to_string(),
        ];
        let documents = filter_pdf_urls(urls);
        assert_eq!(documents.len(), 3);
        assert!(documents
            .iter()
            .all(|u| u.to_lowercase().contains(".pdf")));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_pdf_urls(Vec::new()).is_empty());
    }
}
