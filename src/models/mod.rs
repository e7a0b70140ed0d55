//! Data models for casescrape.

mod case;

pub use case::{CaseQuery, CaseRecord};
