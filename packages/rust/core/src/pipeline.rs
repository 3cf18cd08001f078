//! End-to-end sync run: read roster → scrape dashboards → write back.
//!
//! One logical task, strictly sequential. The caller owns the two
//! collaborators (sheets client, lookup session) and their lifecycles;
//! this module only drives them.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use handisync_shared::{HandicapLookup, Result, SheetLayout};
use handisync_sheets::SheetsClient;

use crate::{extractor, roster, writer};

/// Summary of a completed sync run.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Raw rows read from the sheet, header excluded.
    pub rows_read: usize,
    /// Entries with a membership number, i.e. lookups attempted.
    pub entries: usize,
    /// Lookups that failed and were recorded as the error outcome.
    pub failures: usize,
    /// Cells the batch update reports as written.
    pub updated_cells: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each member's dashboard lookup.
    fn member_scraped(&self, golf_link_no: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, result: &SyncResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn member_scraped(&self, _golf_link_no: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &SyncResult) {}
}

/// Run the full sync.
///
/// 1. Read the roster range
/// 2. Parse entries (rows without a membership number drop out)
/// 3. Look up each member's dashboard, serially
/// 4. Write all outcomes back in one batch
///
/// Sheet read/write failures abort the run; per-member lookup failures
/// never do.
#[instrument(skip_all, fields(range = %layout.read_range()))]
pub async fn run_sync<L: HandicapLookup>(
    layout: &SheetLayout,
    sheets: &SheetsClient,
    lookup: &L,
    progress: &dyn ProgressReporter,
) -> Result<SyncResult> {
    let start = Instant::now();

    progress.phase("Reading roster");
    let raw = sheets.read_range(&layout.read_range()).await?;
    let entries = roster::parse_roster(&raw, layout.first_data_row);
    info!(rows = raw.len(), entries = entries.len(), "roster read");

    progress.phase("Scraping dashboards");
    let results = extractor::scrape_all(lookup, &entries, progress).await;
    let failures = results.iter().filter(|r| r.is_failure()).count();

    progress.phase("Writing results");
    let updated_cells = writer::write_results(sheets, layout, &results).await?;

    let result = SyncResult {
        rows_read: raw.len(),
        entries: entries.len(),
        failures,
        updated_cells,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        rows_read = result.rows_read,
        entries = result.entries,
        failures = result.failures,
        updated_cells = result.updated_cells,
        elapsed_ms = result.elapsed.as_millis(),
        "sync complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use handisync_shared::{HandicapReading, HandisyncError, dashboard_url};

    /// Lookup stub that knows GA1 and GA3 and fails everything else.
    struct StubLookup;

    impl HandicapLookup for StubLookup {
        async fn lookup(&self, golf_link_no: &str) -> handisync_shared::Result<HandicapReading> {
            match golf_link_no {
                "GA1" => Ok(HandicapReading {
                    handicap: Some("12.4".into()),
                    source_url: dashboard_url("https://g", "GA1"),
                }),
                "GA3" => Ok(HandicapReading {
                    handicap: Some("8.0".into()),
                    source_url: dashboard_url("https://g", "GA3"),
                }),
                other => Err(HandisyncError::lookup(format!("{other}: timed out"))),
            }
        }
    }

    fn layout() -> SheetLayout {
        SheetLayout {
            tab: "Sheet1".into(),
            first_data_row: 2,
            handicap_column: "C".into(),
            source_column: "D".into(),
        }
    }

    #[tokio::test]
    async fn full_run_reads_scrapes_and_writes_back() {
        let server = MockServer::start().await;

        // Roster: GA1 ok, row 3 has no membership number, GA9 will fail,
        // GA3 ok.
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-1/values/Sheet1!A2:D"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Sheet1!A2:D5",
                "values": [
                    ["Alice", "GA1"],
                    ["Nobody", ""],
                    ["Carol", "GA9"],
                    ["Bob", "GA3"],
                ],
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-1/values:batchUpdate"))
            .and(body_partial_json(serde_json::json!({
                "valueInputOption": "USER_ENTERED",
                "data": [
                    { "range": "Sheet1!C2:D2",
                      "values": [["12.4", "https://g/member/dashboard?golfLinkNo=GA1"]] },
                    { "range": "Sheet1!C4:D4", "values": [["Error", ""]] },
                    { "range": "Sheet1!C5:D5",
                      "values": [["8.0", "https://g/member/dashboard?golfLinkNo=GA3"]] },
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalUpdatedCells": 6,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sheets = SheetsClient::new(&server.uri(), "sheet-1", "t").unwrap();
        let result = run_sync(&layout(), &sheets, &StubLookup, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.rows_read, 4);
        assert_eq!(result.entries, 3);
        assert_eq!(result.failures, 1);
        assert_eq!(result.updated_cells, 6);
    }

    #[tokio::test]
    async fn empty_roster_skips_the_write_entirely() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Sheet1!A2:D",
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let sheets = SheetsClient::new(&server.uri(), "sheet-1", "t").unwrap();
        let result = run_sync(&layout(), &sheets, &StubLookup, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.rows_read, 0);
        assert_eq!(result.entries, 0);
        assert_eq!(result.updated_cells, 0);
    }

    #[tokio::test]
    async fn roster_read_failure_aborts_the_run() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let sheets = SheetsClient::new(&server.uri(), "sheet-1", "t").unwrap();
        let err = run_sync(&layout(), &sheets, &StubLookup, &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, HandisyncError::Sheets(_)));
    }
}
