//! Pipeline orchestration.
//!
//! [`run_pipeline`] sequences one request: acquire a browser session, drive
//! the portal form, extract the results table, harvest order documents per
//! row, and release the session on every exit path.
//!
//! [`ScrapeWorker`] serializes invocations: a dedicated consumer task owns
//! the queue, so exactly one browser session is in flight at a time — the
//! portal and a local Chromium instance are not assumed safe for concurrent
//! automated sessions.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::catalog::CatalogCache;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::{CaseQuery, CaseRecord};
use crate::scrapers::{extract, harvest, navigator, BrowserSession, NavigationOutcome};

/// Run one extraction for `query`. Unrecoverable navigation failures
/// propagate; a portal that never loads or blocks the submission recovers
/// as an empty result.
pub async fn run_pipeline(
    query: &CaseQuery,
    config: &ScraperConfig,
    catalog: &CatalogCache,
) -> Result<Vec<CaseRecord>, ScrapeError> {
    // The catalog page markup rides along on every record; a failed fetch
    // degrades to an empty field rather than killing the search.
    let raw_page_html = match catalog.get_or_fetch(config).await {
        Ok(snapshot) => snapshot.raw_html,
        Err(e) => {
            warn!("catalog fetch failed, records will carry empty page markup: {}", e);
            String::new()
        }
    };

    let session = BrowserSession::acquire(config).await?;
    let result = drive(&session, query, config, &raw_page_html).await;
    session.release().await;
    result
}

/// Everything between acquire and release. Kept separate so the session is
/// released no matter how this returns.
async fn drive(
    session: &BrowserSession,
    query: &CaseQuery,
    config: &ScraperConfig,
    raw_page_html: &str,
) -> Result<Vec<CaseRecord>, ScrapeError> {
    let page = match navigator::submit(session, query, config).await? {
        NavigationOutcome::Loaded(page) => page,
        NavigationOutcome::LoadTimeout => {
            warn!("portal load timed out, returning no data");
            return Ok(Vec::new());
        }
        NavigationOutcome::SubmissionBlocked => {
            warn!("search submission blocked, returning no data");
            return Ok(Vec::new());
        }
    };

    let html = page.content().await?;
    let mut records = extract::extract_records(&html, &config.portal_url);
    info!(rows = records.len(), "extracted case records");

    for record in &mut records {
        if let Some(order_url) = record.latest_order_url.clone() {
            record.documents = harvest::harvest(session, &page, &order_url, config).await?;
        }
        record.raw_page_html = raw_page_html.to_string();
    }

    let _ = page.close().await;
    Ok(records)
}

/// Map a pipeline result to the caller-facing contract: any error becomes
/// an empty record list ("No data found"), logged here.
fn downgrade(result: Result<Vec<CaseRecord>, ScrapeError>) -> Vec<CaseRecord> {
    match result {
        Ok(records) => records,
        Err(e) => {
            error!("pipeline failed: {}", e);
            Vec::new()
        }
    }
}

struct Job {
    query: CaseQuery,
    reply: oneshot::Sender<Vec<CaseRecord>>,
}

/// Handle to the dedicated pipeline consumer task.
///
/// Submissions queue up and run strictly one at a time. A job is not
/// cancellable once started; its wait bounds are the only way out.
#[derive(Clone)]
pub struct ScrapeWorker {
    tx: mpsc::Sender<Job>,
}

impl ScrapeWorker {
    /// Spawn the consumer task.
    pub fn spawn(config: ScraperConfig, catalog: Arc<CatalogCache>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(16);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let records = downgrade(run_pipeline(&job.query, &config, &catalog).await);
                // Receiver may have given up waiting; nothing to do then
                let _ = job.reply.send(records);
            }
        });

        Self { tx }
    }

    /// Enqueue a query and wait for its records. Returns empty when the
    /// pipeline failed or the worker is gone.
    pub async fn submit(&self, query: CaseQuery) -> Vec<CaseRecord> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Job { query, reply }).await.is_err() {
            error!("scrape worker is no longer running");
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_downgrade_to_empty_results() {
        // Scenario C at this layer: an aborted request surfaces as no data,
        // no panic.
        let result: Result<Vec<CaseRecord>, ScrapeError> = Err(ScrapeError::TabOpenTimeout {
            url: "https://court.example/orders/1".to_string(),
        });
        assert!(downgrade(result).is_empty());
    }

    #[test]
    fn ok_results_pass_through() {
        assert!(downgrade(Ok(Vec::new())).is_empty());
    }
}
