//! choreo-deploy CLI entry point
//!
//! Runs as a CI step; the outcome is reported through workflow commands and
//! the exit code, never by a panic.

use choreo_deploy::actions::{failure_reason, Reporter};
use choreo_deploy::cli::Cli;
use choreo_deploy::config::parse_flag;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match parse_flag("debug", cli.deploy.debug.as_deref()) {
        Ok(true) => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut reporter = Reporter::from_env();
    let outcome = choreo_deploy::cli::deploy::execute(cli.deploy).await;

    let reported = match &outcome {
        Ok(()) => {
            info!("choreo-status deployed");
            reporter.deployed()
        }
        Err(err) => {
            error!(error = %err, "choreo-status failed");
            reporter.failed(&failure_reason(err))
        }
    };
    if let Err(e) = reported {
        error!(error = %e, "Failed to write workflow commands");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
