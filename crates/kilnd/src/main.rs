//! Entry point for the Kiln host daemon.

use std::process::ExitCode;

use clap::Parser;

use kilnd::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match kilnd::bootstrap_with(&cli, Vec::new()) {
        Ok(host) => {
            // The serving loop attaches here; bootstrap alone is a
            // successful run for now.
            let _ = host;
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "host startup failed");
            ExitCode::FAILURE
        }
    }
}
