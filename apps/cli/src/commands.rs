//! CLI command definitions, routing, and tracing setup.

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::ProgressBar;
use tracing::warn;

use handisync_browser::{BrowserSession, await_operator};
use handisync_core::pipeline::{ProgressReporter, SyncResult, run_sync};
use handisync_shared::{
    AppConfig, HandicapLookup, SheetLayout, config_file_path, init_config, load_config,
    sheets_token,
};
use handisync_sheets::SheetsClient;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// handisync — keep a club roster's handicaps current.
#[derive(Parser)]
#[command(
    name = "handisync",
    version,
    about = "Scrape GolfLink handicaps into a Google Sheet roster.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full roster sync (interactive GolfLink login required).
    Sync {
        /// Spreadsheet ID (overrides config).
        #[arg(long)]
        sheet_id: Option<String>,

        /// Worksheet tab holding the roster (overrides config).
        #[arg(long)]
        tab: Option<String>,

        /// WebDriver endpoint (overrides config).
        #[arg(long)]
        webdriver: Option<String>,
    },

    /// Look up a single membership number (for selector debugging).
    Lookup {
        /// GolfLink membership number.
        golf_link_no: String,

        /// WebDriver endpoint (overrides config).
        #[arg(long)]
        webdriver: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "handisync=info",
        1 => "handisync=debug",
        _ => "handisync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync {
            sheet_id,
            tab,
            webdriver,
        } => cmd_sync(sheet_id.as_deref(), tab.as_deref(), webdriver.as_deref()).await,
        Command::Lookup {
            golf_link_no,
            webdriver,
        } => cmd_lookup(&golf_link_no, webdriver.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Load config and apply CLI overrides.
fn resolved_config(
    sheet_id: Option<&str>,
    tab: Option<&str>,
    webdriver: Option<&str>,
) -> Result<AppConfig> {
    let mut config = load_config()?;

    if let Some(id) = sheet_id {
        config.sheet.spreadsheet_id = id.to_string();
    }
    if let Some(tab) = tab {
        config.sheet.tab = tab.to_string();
    }
    if let Some(endpoint) = webdriver {
        config.webdriver.endpoint = endpoint.to_string();
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(
    sheet_id: Option<&str>,
    tab: Option<&str>,
    webdriver: Option<&str>,
) -> Result<()> {
    let config = resolved_config(sheet_id, tab, webdriver)?;

    if config.sheet.spreadsheet_id.is_empty() {
        return Err(eyre!(
            "no spreadsheet configured; set [sheet].spreadsheet_id or pass --sheet-id"
        ));
    }

    // Fail on missing credentials before opening a browser.
    let token = sheets_token(&config)?;
    let sheets = SheetsClient::new(
        &config.sheets_api.api_base,
        &config.sheet.spreadsheet_id,
        &token,
    )?;
    let layout = SheetLayout::from(&config.sheet);

    let session = BrowserSession::connect(&config.webdriver.endpoint, &config.golflink).await?;

    // The session must be released on both paths, so the run happens in a
    // helper whose error we inspect only after closing.
    let outcome = sync_after_login(&session, &layout, &sheets).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close WebDriver session");
    }

    let result = outcome?;
    println!(
        "Synced {} members ({} lookup failures), {} cells updated in {:.1?}.",
        result.entries, result.failures, result.updated_cells, result.elapsed
    );
    Ok(())
}

/// Login bootstrap + full sync, run inside the session's lifetime.
async fn sync_after_login(
    session: &BrowserSession,
    layout: &SheetLayout,
    sheets: &SheetsClient,
) -> Result<SyncResult> {
    session.open_login().await?;
    println!("Log in to GolfLink in the browser window, then press Enter here to continue.");
    await_operator().await?;

    let progress = ConsoleProgress::new();
    Ok(run_sync(layout, sheets, session, &progress).await?)
}

async fn cmd_lookup(golf_link_no: &str, webdriver: Option<&str>) -> Result<()> {
    let config = resolved_config(None, None, webdriver)?;

    let session = BrowserSession::connect(&config.webdriver.endpoint, &config.golflink).await?;

    let outcome = async {
        session.open_login().await?;
        println!("Log in to GolfLink in the browser window, then press Enter here to continue.");
        await_operator().await?;
        session.lookup(golf_link_no).await
    }
    .await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close WebDriver session");
    }

    let reading = outcome?;
    match reading.handicap {
        Some(handicap) => println!("{golf_link_no}: {handicap} ({})", reading.source_url),
        None => println!(
            "{golf_link_no}: dashboard loaded but shows no handicap ({})",
            reading.source_url
        ),
    }
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Spinner-based progress for interactive runs.
struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn member_scraped(&self, golf_link_no: &str, current: usize, total: usize) {
        self.bar
            .set_message(format!("[{current}/{total}] {golf_link_no}"));
    }

    fn done(&self, result: &SyncResult) {
        self.bar.finish_with_message(format!(
            "{} members scraped, {} failures",
            result.entries, result.failures
        ));
    }
}
