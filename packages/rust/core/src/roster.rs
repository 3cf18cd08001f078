//! Roster parsing: raw sheet cells → typed entries.
//!
//! A pure transform of the already-fetched table. Each raw row at index
//! `i` maps to sheet row `first_data_row + i`; rows without a membership
//! number are dropped silently, everything else defaults rather than
//! erroring.

use tracing::debug;

use handisync_shared::RosterEntry;

/// Parse the raw roster table into entries, in sheet order.
pub fn parse_roster(rows: &[Vec<String>], first_data_row: u32) -> Vec<RosterEntry> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let row = first_data_row + i as u32;
            let golf_link_no = cell(raw, 1);
            if golf_link_no.is_empty() {
                debug!(row, "skipping row without a membership number");
                return None;
            }

            Some(RosterEntry {
                row,
                golf_link_no,
                player_name: cell(raw, 0),
                current_handicap: opt_cell(raw, 2),
                current_source: opt_cell(raw, 3),
            })
        })
        .collect()
}

/// Cell text at `idx`, defaulting to empty for short rows.
fn cell(raw: &[String], idx: usize) -> String {
    raw.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Cell text at `idx`, with missing or blank cells as `None`.
fn opt_cell(raw: &[String], idx: usize) -> Option<String> {
    let text = cell(raw, idx);
    if text.is_empty() { None } else { Some(text) }
}
