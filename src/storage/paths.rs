//! Path management for the runner workspace directory structure

use std::path::{Path, PathBuf};

/// Default workspace root on hosted GitHub runners
pub const DEFAULT_WORKSPACE_ROOT: &str = "/home/runner/workspace";

/// Manages paths inside the runner workspace
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    /// Create a new WorkspacePaths instance using the default runner root
    pub fn new() -> Self {
        Self::with_root(DEFAULT_WORKSPACE_ROOT)
    }

    /// Create a new WorkspacePaths instance with a custom root
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Checkout directory of the gitops repository for an app
    pub fn gitops_repo_dir(&self, repo: &str) -> PathBuf {
        self.root.join(repo)
    }

    /// Registry credentials file written by the pipeline's login step
    pub fn registry_credentials(&self, repo: &str, file_name: &str) -> PathBuf {
        self.gitops_repo_dir(repo).join(file_name)
    }
}

impl Default for WorkspacePaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-case only the final segment of a `/`-separated path.
///
/// Manifests are sometimes committed with a different casing than the one
/// passed in by the workflow, so this is the second location to try.
pub fn prepared_path(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/{}", dir, file.to_lowercase()),
        None => path.to_lowercase(),
    }
}
