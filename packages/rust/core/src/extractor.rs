//! The per-member scrape loop.
//!
//! Consumes the full roster one entry at a time, strictly in order, and
//! yields exactly one result per entry. A member whose lookup fails gets
//! the sentinel outcome and the loop moves on; one bad membership number
//! must never abort the batch. There is no retry.

use tracing::{info, warn};

use handisync_shared::{HandicapLookup, HandicapResult, RosterEntry};

use crate::pipeline::ProgressReporter;

/// Look up every entry, producing a same-length, same-order result list.
pub async fn scrape_all<L: HandicapLookup>(
    lookup: &L,
    entries: &[RosterEntry],
    progress: &dyn ProgressReporter,
) -> Vec<HandicapResult> {
    let total = entries.len();
    let mut results = Vec::with_capacity(total);

    for (i, entry) in entries.iter().enumerate() {
        progress.member_scraped(&entry.golf_link_no, i + 1, total);

        let result = match lookup.lookup(&entry.golf_link_no).await {
            Ok(reading) => {
                info!(
                    row = entry.row,
                    golf_link_no = %entry.golf_link_no,
                    handicap = reading.handicap.as_deref().unwrap_or("<none>"),
                    "handicap read"
                );
                HandicapResult {
                    row: entry.row,
                    handicap: reading.handicap,
                    source: reading.source_url,
                }
            }
            Err(e) => {
                warn!(
                    row = entry.row,
                    golf_link_no = %entry.golf_link_no,
                    error = %e,
                    "lookup failed, recording error outcome"
                );
                HandicapResult::failed(entry.row)
            }
        };

        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use handisync_shared::{HandicapReading, HandisyncError, Result, dashboard_url};

    use crate::pipeline::SilentProgress;

    const BASE: &str = "https://www.golf.org.au";

    /// In-memory lookup table: membership number → reading, or a lookup
    /// error for unknown members.
    struct TableLookup {
        readings: HashMap<String, Option<String>>,
    }

    impl TableLookup {
        fn new(entries: &[(&str, Option<&str>)]) -> Self {
            Self {
                readings: entries
                    .iter()
                    .map(|(id, v)| (id.to_string(), v.map(String::from)))
                    .collect(),
            }
        }
    }

    impl HandicapLookup for TableLookup {
        async fn lookup(&self, golf_link_no: &str) -> Result<HandicapReading> {
            match self.readings.get(golf_link_no) {
                Some(handicap) => Ok(HandicapReading {
                    handicap: handicap.clone(),
                    source_url: dashboard_url(BASE, golf_link_no),
                }),
                None => Err(HandisyncError::lookup(format!(
                    "{golf_link_no}: marker never appeared"
                ))),
            }
        }
    }

    fn entry(row: u32, golf_link_no: &str) -> RosterEntry {
        RosterEntry {
            row,
            golf_link_no: golf_link_no.into(),
            player_name: String::new(),
            current_handicap: None,
            current_source: None,
        }
    }

    #[tokio::test]
    async fn one_result_per_entry_in_order() {
        let lookup = TableLookup::new(&[("GA1", Some("12.4")), ("GA3", Some("8.0"))]);
        // GA2 is unknown to the lookup and will fail.
        let entries = vec![entry(2, "GA1"), entry(3, "GA2"), entry(4, "GA3")];

        let results = scrape_all(&lookup, &entries, &SilentProgress).await;

        assert_eq!(results.len(), entries.len());
        let rows: Vec<u32> = results.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn successful_lookup_keeps_value_and_url() {
        let lookup = TableLookup::new(&[("GA1", Some("12.4"))]);
        let results = scrape_all(&lookup, &[entry(2, "GA1")], &SilentProgress).await;

        assert_eq!(results[0].handicap.as_deref(), Some("12.4"));
        assert_eq!(
            results[0].source,
            "https://www.golf.org.au/member/dashboard?golfLinkNo=GA1"
        );
        assert!(!results[0].is_failure());
    }

    #[tokio::test]
    async fn failed_lookup_records_the_sentinel() {
        let lookup = TableLookup::new(&[]);
        let results = scrape_all(&lookup, &[entry(5, "GA9")], &SilentProgress).await;

        assert_eq!(results[0].handicap.as_deref(), Some("Error"));
        assert_eq!(results[0].source, "");
        assert!(results[0].is_failure());
    }

    #[tokio::test]
    async fn dashboard_without_a_value_stays_distinct_from_failure() {
        let lookup = TableLookup::new(&[("GA1", None)]);
        let results = scrape_all(&lookup, &[entry(2, "GA1")], &SilentProgress).await;

        assert_eq!(results[0].handicap, None);
        // The page was found, so the source URL is still recorded.
        assert!(results[0].source.ends_with("golfLinkNo=GA1"));
        assert!(!results[0].is_failure());
    }

    #[tokio::test]
    async fn empty_roster_yields_empty_results() {
        let lookup = TableLookup::new(&[]);
        let results = scrape_all(&lookup, &[], &SilentProgress).await;
        assert!(results.is_empty());
    }
}
