//! handisync CLI — sync GolfLink handicaps into a Google Sheet.
//!
//! Reads a membership roster from the sheet, scrapes each member's
//! dashboard through an operator-authenticated browser session, and
//! writes the results back in one batch.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
