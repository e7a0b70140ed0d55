//! casescrape - headless-browser extraction pipeline for court case-status
//! portals.
//!
//! Given a case identifier (type, number, filing year), drives a headless
//! Chromium instance through the portal's search form, parses the rendered
//! results table into [`CaseRecord`]s, and harvests linked order documents
//! from an auxiliary tab. Persistence and HTTP serving are the caller's job;
//! this crate is a pure in-process library plus a small operator CLI.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;

pub use catalog::{CatalogCache, CatalogSnapshot};
pub use config::ScraperConfig;
pub use error::ScrapeError;
pub use models::{CaseQuery, CaseRecord};
pub use scrapers::{run_pipeline, ScrapeWorker};
