//! WebDriver session against the GolfLink site.
//!
//! One session is acquired at the start of a run and released at the end.
//! Login is interactive: the session opens the login page in the main
//! window and the operator completes it by hand before signalling via
//! console input ([`await_operator`], no timeout).
//!
//! Each member lookup happens in a transient window so the logged-in main
//! window is left untouched. Lookup failures map to the recoverable
//! `Lookup` error variant; everything session-level is fatal.

use std::time::Duration;

use fantoccini::{Client, ClientBuilder, Locator};
use tracing::{debug, info, warn};

use handisync_shared::{
    GolfLinkConfig, HandicapLookup, HandicapReading, HandisyncError, Result, dashboard_url,
};

// ---------------------------------------------------------------------------
// BrowserSession
// ---------------------------------------------------------------------------

/// A live WebDriver session bound to the GolfLink site.
pub struct BrowserSession {
    client: Client,
    base_url: String,
    login_url: String,
    handicap_selector: String,
    lookup_timeout: Duration,
}

impl BrowserSession {
    /// Connect to a WebDriver endpoint (chromedriver/geckodriver).
    ///
    /// Failure here is fatal: without a session no lookups can run.
    pub async fn connect(endpoint: &str, site: &GolfLinkConfig) -> Result<Self> {
        let client = ClientBuilder::native()
            .connect(endpoint)
            .await
            .map_err(|e| HandisyncError::Session(format!("{endpoint}: {e}")))?;

        info!(%endpoint, "WebDriver session established");

        Ok(Self {
            client,
            base_url: site.base_url.clone(),
            login_url: site.login_url.clone(),
            handicap_selector: site.handicap_selector.clone(),
            lookup_timeout: Duration::from_secs(site.lookup_timeout_secs),
        })
    }

    /// Navigate the main window to the login page for the operator.
    pub async fn open_login(&self) -> Result<()> {
        self.client
            .goto(&self.login_url)
            .await
            .map_err(|e| HandisyncError::Session(format!("{}: {e}", self.login_url)))
    }

    /// End the WebDriver session. Called on success and failure paths alike.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| HandisyncError::Session(format!("session close: {e}")))
    }

    /// Navigate to a dashboard and read the handicap marker's text.
    async fn read_dashboard(&self, url: &str) -> Result<String> {
        self.client
            .goto(url)
            .await
            .map_err(|e| HandisyncError::lookup(format!("{url}: navigation failed: {e}")))?;

        let elem = self
            .client
            .wait()
            .at_most(self.lookup_timeout)
            .for_element(Locator::Css(&self.handicap_selector))
            .await
            .map_err(|e| {
                HandisyncError::lookup(format!("{url}: handicap marker never appeared: {e}"))
            })?;

        elem.text()
            .await
            .map_err(|e| HandisyncError::lookup(format!("{url}: text extraction failed: {e}")))
    }

    async fn lookup_in_transient_window(&self, golf_link_no: &str) -> Result<HandicapReading> {
        let url = dashboard_url(&self.base_url, golf_link_no);
        debug!(%golf_link_no, %url, "opening dashboard");

        let main_window = self
            .client
            .window()
            .await
            .map_err(|e| HandisyncError::lookup(format!("{golf_link_no}: {e}")))?;

        let transient = self
            .client
            .new_window(true)
            .await
            .map_err(|e| HandisyncError::lookup(format!("{golf_link_no}: new window: {e}")))?;
        self.client
            .switch_to_window(transient.handle)
            .await
            .map_err(|e| HandisyncError::lookup(format!("{golf_link_no}: window switch: {e}")))?;

        let outcome = self.read_dashboard(&url).await;

        // Tear down the transient window before inspecting the outcome, so
        // the main window is restored on both paths.
        if let Err(e) = self.client.close_window().await {
            warn!(%golf_link_no, error = %e, "failed to close transient window");
        }
        self.client
            .switch_to_window(main_window)
            .await
            .map_err(|e| HandisyncError::lookup(format!("{golf_link_no}: window switch: {e}")))?;

        Ok(reading_from_text(&outcome?, url))
    }
}

impl HandicapLookup for BrowserSession {
    async fn lookup(&self, golf_link_no: &str) -> Result<HandicapReading> {
        self.lookup_in_transient_window(golf_link_no).await
    }
}

/// Build a reading from raw marker text. Whitespace-only text means the
/// dashboard rendered without a value, which is distinct from a failure.
fn reading_from_text(text: &str, source_url: String) -> HandicapReading {
    let trimmed = text.trim();
    HandicapReading {
        handicap: if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        },
        source_url,
    }
}

// ---------------------------------------------------------------------------
// Operator signal
// ---------------------------------------------------------------------------

/// Block until the operator presses Enter on the console.
///
/// Deliberately unbounded: the site demands interactive authentication and
/// the operator decides when it is done. Cancellation is process
/// termination only.
pub async fn await_operator() -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| HandisyncError::Session(format!("console input: {e}")))?;
    Ok(())
}
