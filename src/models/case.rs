//! Case query and record types.

use serde::{Deserialize, Serialize};

/// A case lookup request: type, number, and filing year, passed verbatim to
/// the portal's search form. Constructed by the caller; never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: String,
}

impl CaseQuery {
    pub fn new(
        case_type: impl Into<String>,
        case_number: impl Into<String>,
        filing_year: impl Into<String>,
    ) -> Self {
        Self {
            case_type: case_type.into(),
            case_number: case_number.into(),
            filing_year: filing_year.into(),
        }
    }
}

/// One extracted results-table row.
///
/// Ephemeral: lives for a single request/response cycle. The caller decides
/// whether to persist it, deduplicating by [`CaseRecord::dedup_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Free-text case description, multi-line source joined with spaces.
    pub case_info: String,
    /// Party lines in row order; first is the petitioner, last the
    /// respondent.
    pub parties: Vec<String>,
    /// Listing/court lines in row order; line 0 carries the next-hearing
    /// token, line 1 the last-hearing token.
    pub listing_date_court: Vec<String>,
    pub petitioner: String,
    pub respondent: String,
    pub last_hearing: String,
    pub next_hearing: String,
    /// Target of the second anchor in the case-info cell, when present.
    pub latest_order_url: Option<String>,
    /// Harvested document URLs. Empty (never absent) when no order link
    /// exists or none resolve.
    pub documents: Vec<String>,
    /// Raw markup of the catalog page, carried verbatim for the caller to
    /// store alongside the query.
    pub raw_page_html: String,
}

impl CaseRecord {
    /// The triple the caller deduplicates stored results by.
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.petitioner, &self.respondent, &self.last_hearing)
    }
}
