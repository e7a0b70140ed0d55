//! End-to-end extraction over a realistic results page fixture.

use casescrape::scrapers::extract_records;

const BASE: &str = "https://court.example/app/get-case-type-status";

/// Three rows as the portal renders them: a valid row with an order link,
/// a malformed 3-cell row, and a valid row without links.
const RESULTS_PAGE: &str = r#"
<html>
  <body>
    <table id="caseTable" class="table">
      <tbody>
        <tr>
          <td>1</td>
          <td>
            W.P.(C) 1234/2024
            <br>[DISPOSED]
            <a href="/app/case-status/1234">Case Status</a>
            <a href="/app/orders/1234">Orders</a>
          </td>
          <td>ALICE CORP<br>VS.<br>BOB LTD</td>
          <td>Next Date: 01-01-2025<br>Last Date: 01-12-2024<br>Court No: 14</td>
        </tr>
        <tr>
          <td>2</td>
          <td>broken row</td>
          <td>only three cells</td>
        </tr>
        <tr>
          <td>3</td>
          <td>CRL.A. 55/2023</td>
          <td>STATE</td>
          <td>NDOH: 10-02-2025<br>Last: 12-11-2024</td>
        </tr>
      </tbody>
    </table>
  </body>
</html>
"#;

#[test]
fn extracts_valid_rows_and_skips_malformed_ones() {
    let records = extract_records(RESULTS_PAGE, BASE);

    // The 3-cell row never makes it into the output
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.case_info, "W.P.(C) 1234/2024 [DISPOSED] Case Status Orders");
    assert_eq!(first.petitioner, "ALICE CORP");
    assert_eq!(first.respondent, "BOB LTD");
    assert_eq!(first.parties, vec!["ALICE CORP", "VS.", "BOB LTD"]);
    assert_eq!(first.next_hearing, "01-01-2025");
    assert_eq!(first.last_hearing, "01-12-2024");
    assert_eq!(
        first.latest_order_url.as_deref(),
        Some("https://court.example/app/orders/1234")
    );
    assert!(first.documents.is_empty());

    let second = &records[1];
    assert_eq!(second.case_info, "CRL.A. 55/2023");
    assert_eq!(second.petitioner, "STATE");
    assert_eq!(second.respondent, "STATE");
    assert_eq!(second.next_hearing, "10-02-2025");
    assert_eq!(second.last_hearing, "12-11-2024");
    assert_eq!(second.latest_order_url, None);
}

#[test]
fn derived_fields_stay_consistent_with_their_sources() {
    for record in extract_records(RESULTS_PAGE, BASE) {
        assert_eq!(&record.petitioner, record.parties.first().unwrap());
        assert_eq!(&record.respondent, record.parties.last().unwrap());
        assert_eq!(
            record.next_hearing,
            record.listing_date_court[0]
                .split_whitespace()
                .last()
                .unwrap()
        );
        assert_eq!(
            record.last_hearing,
            record.listing_date_court[1]
                .split_whitespace()
                .last()
                .unwrap()
        );
    }
}
