//! Portal navigator.
//!
//! Drives one browsing context through the portal workflow: load the page,
//! wait for document-ready, fill the search form, best-effort copy the
//! CAPTCHA text, submit, and wait for the results table to render.

use chromiumoxide::Page;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::CaseQuery;
use crate::scrapers::BrowserSession;

/// Form field and results-table element ids on the portal page.
const CASE_TYPE_FIELD: &str = "#case_type";
const CASE_NUMBER_FIELD: &str = "#case_number";
const CASE_YEAR_FIELD: &str = "#case_year";
const CAPTCHA_CODE: &str = "#captcha-code";
const CAPTCHA_INPUT: &str = "#captchaInput";
const SUBMIT_BUTTON: &str = "#search";
const RESULTS_ROW: &str = "#caseTable tbody tr";

/// What a submission attempt produced. Only `Loaded` carries data; the
/// other variants are recovered by returning no records, not by erroring.
pub enum NavigationOutcome {
    /// The results region rendered (or its wait bound elapsed); the page is
    /// ready for extraction and serves as the origin context for harvesting.
    Loaded(Page),
    /// The portal never reported document-ready within bound.
    LoadTimeout,
    /// The submit control was missing or every click attempt failed.
    SubmissionBlocked,
}

/// Run the full form workflow for one query.
pub async fn submit(
    session: &BrowserSession,
    query: &CaseQuery,
    config: &ScraperConfig,
) -> Result<NavigationOutcome, ScrapeError> {
    let page = session.browser().new_page(config.portal_url.as_str()).await?;

    if !wait_document_ready(&page, config).await {
        warn!("portal page did not finish loading within bound");
        let _ = page.close().await;
        return Ok(NavigationOutcome::LoadTimeout);
    }
    info!("portal page fully loaded");

    // Field values go in verbatim; the portal expects exact-match encoding.
    fill_field(&page, CASE_TYPE_FIELD, &query.case_type).await?;
    fill_field(&page, CASE_NUMBER_FIELD, &query.case_number).await?;
    fill_field(&page, CASE_YEAR_FIELD, &query.filing_year).await?;

    fill_captcha(&page).await;

    if !click_submit(&page, config).await? {
        let _ = page.close().await;
        return Ok(NavigationOutcome::SubmissionBlocked);
    }

    wait_for_results(&page, config).await;

    Ok(NavigationOutcome::Loaded(page))
}

/// Poll `document.readyState` until it reports complete, within the
/// configured bound.
async fn wait_document_ready(page: &Page, config: &ScraperConfig) -> bool {
    let poll = async {
        loop {
            if let Ok(result) = page.evaluate("document.readyState".to_string()).await {
                let state: String = result.into_value().unwrap_or_default();
                if state == "complete" {
                    return;
                }
            }
            tokio::time::sleep(config.poll_interval()).await;
        }
    };

    tokio::time::timeout(config.page_load_timeout(), poll)
        .await
        .is_ok()
}

async fn fill_field(page: &Page, selector: &str, value: &str) -> Result<(), ScrapeError> {
    let element = page.find_element(selector).await?;
    element.click().await?;
    element.type_str(value).await?;
    Ok(())
}

/// Best-effort CAPTCHA copy: the portal renders the challenge as plain text
/// in markup. Absent or unreadable means the submission goes out without it
/// and may be rejected downstream; never fatal.
async fn fill_captcha(page: &Page) {
    let code = match page.find_element(CAPTCHA_CODE).await {
        Ok(element) => element.inner_text().await.ok().flatten(),
        Err(_) => None,
    };

    let code = match code {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => {
            warn!("captcha text unavailable, submitting without it");
            return;
        }
    };

    match page.find_element(CAPTCHA_INPUT).await {
        Ok(input) => {
            if let Err(e) = async {
                input.click().await?;
                input.type_str(&code).await
            }
            .await
            {
                warn!("could not enter captcha text: {}", e);
            }
        }
        Err(e) => warn!("captcha input field not found: {}", e),
    }
}

/// Scroll the submit control into the viewport center, let the scroll
/// animation settle, then click. An intercepted click gets one retry via a
/// script-level click. Returns false when the submission could not be sent.
async fn click_submit(page: &Page, config: &ScraperConfig) -> Result<bool, ScrapeError> {
    let element = match page.find_element(SUBMIT_BUTTON).await {
        Ok(element) => element,
        Err(e) => {
            warn!("submit control not found: {}", e);
            return Ok(false);
        }
    };

    if let Err(e) = page
        .evaluate(format!(
            "document.querySelector('{}').scrollIntoView({{block: 'center'}});",
            SUBMIT_BUTTON
        ))
        .await
    {
        debug!("scroll into view failed: {}", e);
    }
    tokio::time::sleep(config.scroll_settle()).await;

    match element.click().await {
        Ok(_) => Ok(true),
        Err(e) => {
            // Overlapping elements intercept the click; a DOM-level click
            // bypasses hit testing.
            debug!("click intercepted, retrying via script: {}", e);
            match page
                .evaluate(format!(
                    "document.querySelector('{}').click();",
                    SUBMIT_BUTTON
                ))
                .await
            {
                Ok(_) => Ok(true),
                Err(e) => {
                    warn!("script-level click failed: {}", e);
                    Ok(false)
                }
            }
        }
    }
}

/// Wait for at least one results row to appear. The portal offers no
/// readiness signal for this step, so an elapsed bound is treated as
/// rendered-anyway and extraction proceeds on whatever DOM is present.
async fn wait_for_results(page: &Page, config: &ScraperConfig) {
    let poll = async {
        loop {
            if page.find_element(RESULTS_ROW).await.is_ok() {
                return;
            }
            tokio::time::sleep(config.poll_interval()).await;
        }
    };

    match tokio::time::timeout(config.results_timeout(), poll).await {
        Ok(()) => debug!("results table rendered"),
        Err(_) => debug!("results table did not render within bound, proceeding with current DOM"),
    }
}
