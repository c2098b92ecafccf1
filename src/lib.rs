//! choreo-deploy - CI step that hands a built image over to the Choreo deployment API
//!
//! The crate reads registry credentials and Kubernetes manifests from the
//! runner workspace, assembles a deployment request and posts it once.

pub mod actions;
pub mod api;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod registry;
pub mod storage;

use thiserror::Error;

/// Main error type for choreo-deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error("Invalid value for input {name}: {value}")]
    InvalidInput { name: String, value: String },

    #[error("Invalid registry credential: {0}")]
    InvalidCredential(String),

    #[error("Registry token is empty, no deployment endpoint to call")]
    MissingToken,

    #[error("Deployment API responded with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("No response received from {method} {url}: {reason}")]
    NoResponse {
        method: String,
        url: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DeployError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "choreo-deploy";
