//! Result table extractor.
//!
//! Pure parsing of the rendered results page: rows in document order become
//! [`CaseRecord`]s, malformed rows are skipped with a log line, and ordering
//! is preserved. No browser handle needed, so the splitting and selection
//! rules are unit-testable against markup fixtures.
//!
//! Cell text reproduces WebDriver `.text` semantics: `<br>` and block-level
//! boundaries become line breaks, whitespace runs inside a line collapse to
//! single spaces, and blank lines are dropped.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::models::CaseRecord;

const RESULTS_ROW: &str = "#caseTable tbody tr";

/// Sentinel inserted where markup implies a rendered line break, so source
/// formatting newlines (which do not render) can be collapsed separately.
const LINE_BREAK: char = '\u{1E}';

fn break_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</div>|</li>").expect("static regex"))
}

/// Parse the results page into records, in row order.
///
/// Per row (0-based cells; cell 0 is the serial number):
/// - fewer than 4 cells: malformed, skipped;
/// - cell 1: case info (lines joined with spaces) and the order link (the
///   second anchor's href, when at least two anchors exist);
/// - cell 2: parties; petitioner is the first line, respondent the last;
/// - cell 3: listing/court lines; the next-hearing value is the last
///   whitespace token of line 0, the last-hearing value the last token of
///   line 1.
///
/// `documents` starts empty on every record; the orchestrator fills it when
/// an order link harvests successfully. `raw_page_html` is stamped later.
pub fn extract_records(html: &str, base_url: &str) -> Vec<CaseRecord> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(RESULTS_ROW).expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");
    let anchor_selector = Selector::parse("a").expect("static selector");

    let mut records = Vec::new();

    for (idx, row) in document.select(&row_selector).enumerate() {
        let row_number = idx + 1;
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();

        if cells.len() < 4 {
            warn!(row = row_number, cells = cells.len(), "skipping row with fewer than 4 cells");
            continue;
        }

        let case_info_lines = cell_lines(&cells[1]);
        let parties = cell_lines(&cells[2]);
        let listing_date_court = cell_lines(&cells[3]);

        let Some(petitioner) = parties.first().cloned() else {
            warn!(row = row_number, "skipping row with empty parties cell");
            continue;
        };
        // parties is non-empty here; a single party means petitioner and
        // respondent coincide, which is valid.
        let respondent = parties
            .last()
            .cloned()
            .unwrap_or_else(|| petitioner.clone());

        if listing_date_court.len() < 2 {
            warn!(row = row_number, "skipping row with malformed listing cell");
            continue;
        }
        let next_hearing = last_token(&listing_date_court[0]);
        let last_hearing = last_token(&listing_date_court[1]);

        let anchors: Vec<&str> = cells[1]
            .select(&anchor_selector)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        let latest_order_url = if anchors.len() >= 2 {
            Some(resolve_url(base_url, anchors[1]))
        } else {
            None
        };

        records.push(CaseRecord {
            case_info: case_info_lines.join(" "),
            parties,
            listing_date_court,
            petitioner,
            respondent,
            last_hearing,
            next_hearing,
            latest_order_url,
            documents: Vec::new(),
            raw_page_html: String::new(),
        });
    }

    records
}

/// Rendered text lines of a table cell: break tags become line boundaries,
/// whitespace inside a line collapses, blank lines drop out.
fn cell_lines(cell: &ElementRef) -> Vec<String> {
    let html = cell.inner_html();
    let marked = break_tag_re().replace_all(&html, LINE_BREAK.to_string());
    let fragment = Html::parse_fragment(&marked);
    let text: String = fragment.root_element().text().collect();

    text.split(LINE_BREAK)
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Last whitespace-delimited token of a line. Lines here are non-empty, but
/// an all-whitespace line degrades to an empty string rather than panicking.
fn last_token(line: &str) -> String {
    line.split_whitespace().last().unwrap_or_default().to_string()
}

/// Resolve an anchor target against the portal URL. Hrefs on the portal are
/// usually absolute; relative ones are joined without any normalization.
fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if let Some(stripped) = path.strip_prefix('/') {
        format!("{}/{}", url_origin(base_url), stripped)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), path)
    }
}

/// `scheme://host[:port]` portion of a URL, without trailing slash.
fn url_origin(url: &str) -> &str {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(i) => &url[..scheme_end + 3 + i],
                None => url,
            }
        }
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://court.example/app/get-case-type-status";

    fn table(rows: &str) -> String {
        format!(
            "<html><body><table id=\"caseTable\"><tbody>{}</tbody></table></body></html>",
            rows
        )
    }

    fn four_cell_row(case_info: &str, parties: &str, listing: &str) -> String {
        format!(
            "<tr><td>1</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            case_info, parties, listing
        )
    }

    #[test]
    fn single_row_without_links() {
        // Scenario A: one 4-column row, no anchors.
        let html = table(&four_cell_row(
            "W.P.(C) 123/2024<br>Pending",
            "Alice Corp<br>Bob Ltd",
            "Next: 01-01-2025<br>Last: 01-12-2024",
        ));
        let records = extract_records(&html, BASE);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.case_info, "W.P.(C) 123/2024 Pending");
        assert_eq!(r.petitioner, "Alice Corp");
        assert_eq!(r.respondent, "Bob Ltd");
        assert_eq!(r.next_hearing, "01-01-2025");
        assert_eq!(r.last_hearing, "01-12-2024");
        assert_eq!(r.latest_order_url, None);
        assert!(r.documents.is_empty());
    }

    #[test]
    fn petitioner_and_respondent_come_from_first_and_last_party() {
        let html = table(&four_cell_row(
            "X",
            "First Petitioner<br>VS<br>Last Respondent",
            "NDOH 02-02-2025<br>Last 03-03-2024",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(records[0].petitioner, "First Petitioner");
        assert_eq!(records[0].respondent, "Last Respondent");
        assert_eq!(
            records[0].parties,
            vec!["First Petitioner", "VS", "Last Respondent"]
        );
    }

    #[test]
    fn single_party_row_is_valid() {
        let html = table(&four_cell_row(
            "X",
            "In Re: Sole Party",
            "Next 01-01-2025<br>Last 01-12-2024",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].petitioner, records[0].respondent);
        assert_eq!(records[0].petitioner, "In Re: Sole Party");
    }

    #[test]
    fn hearing_dates_are_last_tokens_of_listing_lines() {
        let html = table(&four_cell_row(
            "X",
            "A<br>B",
            "Next Date of Hearing : 15-08-2025<br>Court No : Last Date 20-07-2025",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(records[0].next_hearing, "15-08-2025");
        assert_eq!(records[0].last_hearing, "20-07-2025");
        assert_eq!(records[0].listing_date_court.len(), 2);
    }

    #[test]
    fn short_rows_are_skipped_and_later_rows_survive() {
        // Scenario D: a 3-column row is excluded, the valid row after it is
        // still processed.
        let rows = format!(
            "<tr><td>1</td><td>short</td><td>row</td></tr>{}",
            four_cell_row("Valid", "P<br>R", "N 01-01-2025<br>L 01-12-2024")
        );
        let records = extract_records(&table(&rows), BASE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].case_info, "Valid");
    }

    #[test]
    fn output_order_matches_row_order() {
        let rows = format!(
            "{}{}",
            four_cell_row("First", "A<br>B", "N 01<br>L 02"),
            four_cell_row("Second", "C<br>D", "N 03<br>L 04")
        );
        let records = extract_records(&table(&rows), BASE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].case_info, "First");
        assert_eq!(records[1].case_info, "Second");
    }

    #[test]
    fn second_anchor_becomes_order_url() {
        let html = table(&four_cell_row(
            "Case <a href=\"/app/status/1\">Status</a> <a href=\"/app/orders/1\">Orders</a>",
            "A<br>B",
            "N 01-01-2025<br>L 01-12-2024",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(
            records[0].latest_order_url.as_deref(),
            Some("https://court.example/app/orders/1")
        );
    }

    #[test]
    fn no_anchors_means_no_order_url() {
        let html = table(&four_cell_row(
            "Case plain",
            "A<br>B",
            "N 01-01-2025<br>L 01-12-2024",
        ));
        assert_eq!(extract_records(&html, BASE)[0].latest_order_url, None);
    }

    #[test]
    fn a_single_anchor_means_no_order_url() {
        let html = table(&four_cell_row(
            "Case <a href=\"/app/status/1\">Status</a>",
            "A<br>B",
            "N 01-01-2025<br>L 01-12-2024",
        ));
        assert_eq!(extract_records(&html, BASE)[0].latest_order_url, None);
    }

    #[test]
    fn absolute_anchor_targets_pass_through() {
        let html = table(&four_cell_row(
            "<a href=\"#\">x</a><a href=\"https://other.example/order.pdf\">y</a>",
            "A<br>B",
            "N 01-01-2025<br>L 01-12-2024",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(
            records[0].latest_order_url.as_deref(),
            Some("https://other.example/order.pdf")
        );
    }

    #[test]
    fn listing_cell_with_one_line_is_malformed() {
        let rows = format!(
            "{}{}",
            four_cell_row("Broken", "A<br>B", "only one line"),
            four_cell_row("Fine", "A<br>B", "N 01-01-2025<br>L 01-12-2024")
        );
        let records = extract_records(&table(&rows), BASE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].case_info, "Fine");
    }

    #[test]
    fn empty_parties_cell_is_malformed() {
        let rows = four_cell_row("X", "  ", "N 01-01-2025<br>L 01-12-2024");
        assert!(extract_records(&table(&rows), BASE).is_empty());
    }

    #[test]
    fn source_newlines_do_not_split_lines() {
        // Formatting whitespace in the markup collapses; only <br> and
        // block boundaries break lines.
        let html = table(&four_cell_row(
            "W.P.(C)\n   123/2024",
            "Alice\n Corp<br>Bob Ltd",
            "Next 01-01-2025<br>Last 01-12-2024",
        ));
        let records = extract_records(&html, BASE);
        assert_eq!(records[0].case_info, "W.P.(C) 123/2024");
        assert_eq!(records[0].petitioner, "Alice Corp");
    }

    #[test]
    fn empty_table_yields_no_records() {
        assert!(extract_records(&table(""), BASE).is_empty());
        assert!(extract_records("<html><body>No data</body></html>", BASE).is_empty());
    }

    #[test]
    fn resolve_url_handles_relative_and_rooted_paths() {
        assert_eq!(
            resolve_url(BASE, "/app/orders/2"),
            "https://court.example/app/orders/2"
        );
        assert_eq!(
            resolve_url(BASE, "orders/2"),
            "https://court.example/app/get-case-type-status/orders/2"
        );
        assert_eq!(
            resolve_url(BASE, "https://x.example/y.pdf"),
            "https://x.example/y.pdf"
        );
    }
}
