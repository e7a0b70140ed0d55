//! Browser session manager.
//!
//! Owns a single headless Chromium process per pipeline invocation: launch
//! with fixed capability flags, guaranteed teardown via
//! [`BrowserSession::release`]. No pooling — the pipeline worker serializes
//! invocations to one in-flight session.

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;

/// One live browser process and its CDP handler task.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Launch a browser for one pipeline invocation.
    ///
    /// Launch failure is fatal to the current request only; the caller
    /// surfaces it as an empty result.
    pub async fn acquire(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let chrome_path = Self::find_chrome().map_err(ScrapeError::Launch)?;

        info!(headless = config.headless, "launching browser");

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);

        // with_head means NOT headless, confusingly
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--no-sandbox") // needed for headless in containers/restricted environments
            .arg("--disable-gpu") // recommended for headless
            .arg("--disable-dev-shm-usage");

        for arg in &config.chrome_args {
            builder = builder.arg(arg.as_str());
        }

        let browser_config = builder.build().map_err(ScrapeError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // Spawn handler task
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Find Chrome executable.
    fn find_chrome() -> Result<std::path::PathBuf, String> {
        // First, check common paths
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        // Check if in PATH via `which`
        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        info!("found Chrome in PATH: {}", path);
                        return Ok(std::path::PathBuf::from(path));
                    }
                }
            }
        }

        Err("Chrome/Chromium not found. Install chromium or google-chrome.".to_string())
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Tear the browser process down. Must run exactly once per `acquire`,
    /// on every exit path; the orchestrator calls it outside its fallible
    /// navigation block so no OS process leaks.
    pub async fn release(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("browser did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
    }
}
