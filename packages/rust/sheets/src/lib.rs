//! Google Sheets values client for handisync.
//!
//! Thin wrapper over the Sheets v4 `values` endpoints: one range read at
//! the start of a run, one batched update at the end. Writes use the
//! `USER_ENTERED` input mode so the sheet applies its own type coercion
//! (handicaps land as numbers, not quoted text).
//!
//! Any failure here is fatal to the run; there is no retry and no
//! per-record write path.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use handisync_shared::{HandisyncError, Result};

/// User-Agent string for Sheets API requests.
const USER_AGENT: &str = concat!("handisync/", env!("CARGO_PKG_VERSION"));

/// Timeout for Sheets API requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One `(range, values)` pair of a batched update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeUpdate {
    /// A1 target range.
    pub range: String,
    /// Row-major cell values to place there.
    pub values: Vec<Vec<String>>,
}

/// Response body of a `values/{range}` read.
#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Absent entirely when the range holds no data.
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Request body of a `values:batchUpdate`.
#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    #[serde(rename = "valueInputOption")]
    value_input_option: &'static str,
    data: &'a [RangeUpdate],
}

/// Response body of a `values:batchUpdate`.
#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(rename = "totalUpdatedCells", default)]
    total_updated_cells: usize,
}

// ---------------------------------------------------------------------------
// SheetsClient
// ---------------------------------------------------------------------------

/// Authenticated client bound to one spreadsheet.
pub struct SheetsClient {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsClient {
    /// Create a client for the given API base, spreadsheet and bearer token.
    pub fn new(api_base: &str, spreadsheet_id: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| HandisyncError::Sheets(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Read a cell range as a row-major table of text.
    ///
    /// A range with no data comes back as an empty table, not an error.
    #[instrument(skip_all, fields(range = %range))]
    pub async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{range}",
            self.api_base, self.spreadsheet_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| HandisyncError::Sheets(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandisyncError::Sheets(format!("{url}: HTTP {status}")));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| HandisyncError::Sheets(format!("{url}: bad response body: {e}")))?;

        debug!(rows = body.values.len(), "range read");
        Ok(body.values)
    }

    /// Apply all updates as one `values:batchUpdate` request.
    ///
    /// Returns the number of cells the API reports as updated. The updates
    /// land together or not at all, to the extent the backend guarantees it;
    /// there is no partial-write handling on this side.
    #[instrument(skip_all, fields(ranges = updates.len()))]
    pub async fn batch_update(&self, updates: &[RangeUpdate]) -> Result<usize> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values:batchUpdate",
            self.api_base, self.spreadsheet_id
        );

        let body = BatchUpdateRequest {
            value_input_option: "USER_ENTERED",
            data: updates,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| HandisyncError::Sheets(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandisyncError::Sheets(format!("{url}: HTTP {status}")));
        }

        let parsed: BatchUpdateResponse = response
            .json()
            .await
            .map_err(|e| HandisyncError::Sheets(format!("{url}: bad response body: {e}")))?;

        info!(
            ranges = updates.len(),
            cells = parsed.total_updated_cells,
            "batch update applied"
        );
        Ok(parsed.total_updated_cells)
    }
}
