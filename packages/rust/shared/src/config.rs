//! Application configuration for handisync.
//!
//! User config lives at `~/.handisync/handisync.toml`.
//! CLI flags override config file values, which override defaults.
//!
//! The sheets API token is never stored in the file; the config only names
//! the environment variable that holds it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HandisyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "handisync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".handisync";

// ---------------------------------------------------------------------------
// Config structs (matching handisync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Roster sheet settings.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Sheets API settings.
    #[serde(default)]
    pub sheets_api: SheetsApiConfig,

    /// GolfLink site settings.
    #[serde(default)]
    pub golflink: GolfLinkConfig,

    /// WebDriver settings.
    #[serde(default)]
    pub webdriver: WebDriverConfig,
}

/// `[sheet]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet ID of the roster workbook.
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Worksheet tab holding the roster. Tabs with spaces must be quoted
    /// A1-style in the config (e.g. `'Club Roster'`).
    #[serde(default = "default_tab")]
    pub tab: String,

    /// Row number of the first data row (row 1 is the header).
    #[serde(default = "default_first_data_row")]
    pub first_data_row: u32,

    /// Column the handicap is written to.
    #[serde(default = "default_handicap_column")]
    pub handicap_column: String,

    /// Column the dashboard URL is written to.
    #[serde(default = "default_source_column")]
    pub source_column: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            tab: default_tab(),
            first_data_row: default_first_data_row(),
            handicap_column: default_handicap_column(),
            source_column: default_source_column(),
        }
    }
}

fn default_tab() -> String {
    "Sheet1".into()
}
fn default_first_data_row() -> u32 {
    2
}
fn default_handicap_column() -> String {
    "C".into()
}
fn default_source_column() -> String {
    "D".into()
}

/// `[sheets_api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsApiConfig {
    /// Base URL of the Sheets API (overridable for tests).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the env var holding the OAuth bearer token
    /// (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for SheetsApiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com".into()
}
fn default_token_env() -> String {
    "HANDISYNC_SHEETS_TOKEN".into()
}

/// `[golflink]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GolfLinkConfig {
    /// Base URL of the GolfLink site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Login page the operator completes by hand.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// CSS selector for the handicap figure on the member dashboard.
    #[serde(default = "default_handicap_selector")]
    pub handicap_selector: String,

    /// Seconds to wait for the handicap marker before recording a failure.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl Default for GolfLinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_url: default_login_url(),
            handicap_selector: default_handicap_selector(),
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.golf.org.au".into()
}
fn default_login_url() -> String {
    "https://www.golf.org.au/login".into()
}
fn default_handicap_selector() -> String {
    ".handicap-value".into()
}
fn default_lookup_timeout() -> u64 {
    15
}

/// `[webdriver]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    /// WebDriver endpoint (chromedriver/geckodriver).
    #[serde(default = "default_webdriver_endpoint")]
    pub endpoint: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_webdriver_endpoint(),
        }
    }
}

fn default_webdriver_endpoint() -> String {
    "http://localhost:4444".into()
}

// ---------------------------------------------------------------------------
// Sheet layout (runtime view of the [sheet] section)
// ---------------------------------------------------------------------------

/// Where the roster lives on the sheet and where results go back.
///
/// The roster block is fixed: name in column A, membership number in B,
/// then the two result columns.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Worksheet tab name.
    pub tab: String,
    /// First data row (header excluded).
    pub first_data_row: u32,
    /// Destination column for the handicap value.
    pub handicap_column: String,
    /// Destination column for the dashboard URL.
    pub source_column: String,
}

impl SheetLayout {
    /// A1 range covering the whole roster block, open-ended downward.
    pub fn read_range(&self) -> String {
        format!(
            "{}!A{}:{}",
            self.tab, self.first_data_row, self.source_column
        )
    }

    /// A1 range of the two result cells on one row.
    pub fn result_range(&self, row: u32) -> String {
        format!(
            "{}!{}{row}:{}{row}",
            self.tab, self.handicap_column, self.source_column
        )
    }
}

impl From<&SheetConfig> for SheetLayout {
    fn from(config: &SheetConfig) -> Self {
        Self {
            tab: config.tab.clone(),
            first_data_row: config.first_data_row,
            handicap_column: config.handicap_column.clone(),
            source_column: config.source_column.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.handisync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HandisyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.handisync/handisync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HandisyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        HandisyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HandisyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HandisyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HandisyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the sheets API bearer token from the env var named in config.
pub fn sheets_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.sheets_api.token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(HandisyncError::config(format!(
            "sheets API token not found. Set the {var_name} environment variable \
             to an OAuth bearer token with spreadsheet access."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("spreadsheet_id"));
        assert!(toml_str.contains("HANDISYNC_SHEETS_TOKEN"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.sheet.first_data_row, 2);
        assert_eq!(parsed.golflink.base_url, "https://www.golf.org.au");
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let toml_str = r#"
[sheet]
spreadsheet_id = "1AbC"
tab = "Roster"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sheet.spreadsheet_id, "1AbC");
        assert_eq!(config.sheet.tab, "Roster");
        assert_eq!(config.sheet.handicap_column, "C");
        assert_eq!(config.webdriver.endpoint, "http://localhost:4444");
    }

    #[test]
    fn layout_ranges() {
        let layout = SheetLayout::from(&SheetConfig::default());
        assert_eq!(layout.read_range(), "Sheet1!A2:D");
        assert_eq!(layout.result_range(5), "Sheet1!C5:D5");
    }

    #[test]
    fn token_lookup_fails_when_unset() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.sheets_api.token_env = "HS_TEST_NONEXISTENT_TOKEN_98765".into();
        let result = sheets_token(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("token not found"));
    }
}
