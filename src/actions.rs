//! GitHub Actions workflow commands
//!
//! The runner reads `::debug::` and `::error::` lines from stdout and step
//! outputs from the file named by `GITHUB_OUTPUT`. Logging goes to stderr so
//! these lines are the only thing on stdout.

use crate::DeployError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// Step output carrying the deployment status
pub const STATUS_OUTPUT: &str = "choreo-status";

/// Writes step results in the runner's command format
pub struct Reporter<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl Reporter<io::Stdout> {
    /// Reporter on stdout, writing outputs to `GITHUB_OUTPUT` when set
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self { out, output_file }
    }

    pub fn debug(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::debug::{}", escape_data(message))
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_data(message))
    }

    /// Append a step output; a no-op outside of a runner
    pub fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.output_file else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}={}", name, value)
    }

    pub fn deployed(&mut self) -> io::Result<()> {
        self.debug("choreo-status deployed")?;
        self.set_output(STATUS_OUTPUT, "deployed")
    }

    /// Mark the step failed with `reason`
    pub fn failed(&mut self, reason: &str) -> io::Result<()> {
        self.debug("choreo-status failed")?;
        self.error(reason)?;
        self.set_output(STATUS_OUTPUT, "failed")
    }
}

/// Escape a message the same way the actions toolkit does
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Text shown as the step's failure.
///
/// A rejection from the API is passed through untouched so the caller sees
/// the server's own error body.
pub fn failure_reason(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DeployError>() {
        Some(DeployError::Rejected { body, .. }) => body.clone(),
        _ => err.to_string(),
    }
}
