//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive city prompt
//! - Human-friendly output formatting

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod frontend;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
