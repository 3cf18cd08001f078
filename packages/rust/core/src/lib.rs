//! Core sync logic: roster parsing, the scrape loop, and write-back.
//!
//! Everything here runs against the [`handisync_shared::HandicapLookup`]
//! trait rather than a live browser, so the whole pipeline is testable
//! with an in-memory lookup and a mock sheets backend.

pub mod extractor;
pub mod pipeline;
pub mod roster;
pub mod writer;

pub use extractor::scrape_all;
pub use pipeline::{ProgressReporter, SilentProgress, SyncResult, run_sync};
pub use roster::parse_roster;
pub use writer::{build_updates, write_results};
