//! Binary crate for the `weather-proxy` command.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the lookup pipeline over HTTP
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod logging;
mod routes;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}
