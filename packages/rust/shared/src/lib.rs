//! Shared types, error model, and configuration for handisync.
//!
//! This crate is the foundation depended on by all other handisync crates.
//! It provides:
//! - [`HandisyncError`] — the unified error type
//! - Domain types ([`RosterEntry`], [`HandicapResult`], [`HandicapReading`])
//! - The [`HandicapLookup`] capability trait behind which the live browser
//!   session sits, keeping the core loop unit-testable
//! - Configuration ([`AppConfig`], [`SheetLayout`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GolfLinkConfig, SheetConfig, SheetLayout, SheetsApiConfig, WebDriverConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, sheets_token,
};
pub use error::{HandisyncError, Result};
pub use types::{
    ERROR_CELL_TEXT, HandicapLookup, HandicapReading, HandicapResult, RosterEntry, dashboard_url,
};
