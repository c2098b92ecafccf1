//! CLI definition
//!
//! Every input can be given as a flag or through the `INPUT_*` variable the
//! Actions runner sets for the step.

pub mod deploy;

use clap::Parser;

/// choreo-deploy - Notify the Choreo deployment API about a built image
#[derive(Parser)]
#[command(name = "choreo-deploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub deploy: deploy::DeployArgs,
}
