//! Core domain types for the handicap sync run.

use crate::error::Result;

/// Cell text written in place of a handicap when a member's lookup fails.
pub const ERROR_CELL_TEXT: &str = "Error";

// ---------------------------------------------------------------------------
// RosterEntry
// ---------------------------------------------------------------------------

/// One row of the roster sheet, as read at the start of a run.
///
/// Entries are immutable once parsed. Rows whose membership number is empty
/// never become entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Sheet row number this entry came from (and will be written back to).
    /// Unique and strictly increasing in read order.
    pub row: u32,
    /// GolfLink membership number used for the dashboard lookup. Non-empty.
    pub golf_link_no: String,
    /// Member name, informational only. May be empty.
    pub player_name: String,
    /// Handicap currently in the sheet, if any. Not consumed by the run.
    pub current_handicap: Option<String>,
    /// Source URL currently in the sheet, if any. Not consumed by the run.
    pub current_source: Option<String>,
}

// ---------------------------------------------------------------------------
// HandicapResult
// ---------------------------------------------------------------------------

/// Outcome of one member's lookup, keyed back to the sheet by row number.
///
/// Exactly one result is produced per [`RosterEntry`], in input order.
/// `handicap` distinguishes three cases: `Some(text)` for an extracted
/// value, `None` when the dashboard loaded but showed no value, and
/// `Some(ERROR_CELL_TEXT)` when the lookup failed outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandicapResult {
    /// Row number copied unchanged from the originating entry.
    pub row: u32,
    /// Extracted handicap text, absent value, or the error sentinel.
    pub handicap: Option<String>,
    /// Dashboard URL on success, empty string on failure.
    pub source: String,
}

impl HandicapResult {
    /// The fixed outcome recorded when a member's lookup fails.
    pub fn failed(row: u32) -> Self {
        Self {
            row,
            handicap: Some(ERROR_CELL_TEXT.to_string()),
            source: String::new(),
        }
    }

    /// Whether this is the sentinel outcome of a failed lookup.
    pub fn is_failure(&self) -> bool {
        self.source.is_empty() && self.handicap.as_deref() == Some(ERROR_CELL_TEXT)
    }
}

// ---------------------------------------------------------------------------
// Lookup capability
// ---------------------------------------------------------------------------

/// Success payload of a single dashboard lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandicapReading {
    /// Handicap text from the dashboard, or `None` if the page rendered
    /// without a value.
    pub handicap: Option<String>,
    /// The dashboard URL the reading came from.
    pub source_url: String,
}

/// The external lookup capability consumed by the extractor.
///
/// Implemented by the live WebDriver session; tests substitute an
/// in-memory table so the core loop runs without a browser.
pub trait HandicapLookup {
    /// Look up one member's handicap by membership number.
    ///
    /// Errors are per-record: the caller records the sentinel outcome and
    /// continues with the next member.
    fn lookup(
        &self,
        golf_link_no: &str,
    ) -> impl std::future::Future<Output = Result<HandicapReading>> + Send;
}

/// Canonical dashboard URL for a membership number.
///
/// Pure string templating: the URL is known before any navigation happens.
pub fn dashboard_url(base: &str, golf_link_no: &str) -> String {
    format!(
        "{}/member/dashboard?golfLinkNo={golf_link_no}",
        base.trim_end_matches('/')
    )
}
