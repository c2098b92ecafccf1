//! Registry credentials file loading
//!
//! The pipeline's login step leaves a JSON array of registry credentials in
//! the gitops checkout. Every registry except the docker-hub pull-through
//! login gets the freshly built image pushed to it; this module derives the
//! pushed image references and the active cloud provider from that file.

use super::{CloudProvider, RegistryType};
use crate::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Registry id of the docker hub login used only to raise pull rate limits
pub const DOCKER_HUB_PULL_REGISTRY_ID: &str = "choreo-docker-hub";

/// One record of the credentials file
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryCredential {
    pub registry_id: String,
    #[serde(rename = "type")]
    pub registry_type: RegistryType,
    pub credentials: RegistryEndpoint,
    #[serde(default)]
    pub clusters: Vec<String>,
}

/// Where a registry lives
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEndpoint {
    pub registry: String,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Image reference pushed to one registry, and the clusters pulling it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterImageTag {
    pub registry_id: String,
    pub clusters: Vec<String>,
    pub image_name_with_tag: String,
}

/// Values that go into every pushed image reference
#[derive(Debug, Clone, Copy)]
pub struct ImageContext<'a> {
    /// Gitops repository identifier of the app
    pub repo: &'a str,
    pub organization_uuid: &'a str,
    /// Commit SHA the image was built from
    pub new_sha: &'a str,
}

/// Result of reading the credentials file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Provider of the last known registry in the file
    pub provider: Option<CloudProvider>,
    pub cluster_image_tags: Vec<ClusterImageTag>,
}

impl RegistryCredential {
    pub fn is_pull_through(&self) -> bool {
        self.registry_id == DOCKER_HUB_PULL_REGISTRY_ID
    }

    /// Full image reference pushed to this registry
    pub fn image_name_with_tag(&self, ctx: &ImageContext<'_>) -> Result<String> {
        let registry = &self.credentials.registry;
        match self.registry_type {
            RegistryType::Ecr => Ok(format!(
                "{}/{}:{}-{}",
                registry, ctx.organization_uuid, ctx.repo, ctx.new_sha
            )),
            RegistryType::Gcp => {
                let repository = self.credentials.repository.as_deref().ok_or_else(|| {
                    DeployError::InvalidCredential(format!(
                        "GCP registry {} has no repository",
                        self.registry_id
                    ))
                })?;
                Ok(format!(
                    "{}/{}/{}:{}",
                    registry, repository, ctx.repo, ctx.new_sha
                ))
            }
            _ => Ok(format!("{}/{}:{}", registry, ctx.repo, ctx.new_sha)),
        }
    }
}

impl RegistrySummary {
    /// Fold a single raw record into the summary
    fn add(&mut self, record: serde_json::Value, ctx: &ImageContext<'_>) -> Result<()> {
        let cred: RegistryCredential = serde_json::from_value(record)?;
        if cred.is_pull_through() {
            debug!(registry_id = %cred.registry_id, "Skipping pull-through registry");
            return Ok(());
        }

        let image_name_with_tag = cred.image_name_with_tag(ctx)?;
        debug!(
            registry_id = %cred.registry_id,
            image = %image_name_with_tag,
            "Resolved registry image"
        );
        if let Some(provider) = cred.registry_type.provider() {
            self.provider = Some(provider);
        }
        self.cluster_image_tags.push(ClusterImageTag {
            registry_id: cred.registry_id,
            clusters: cred.clusters,
            image_name_with_tag,
        });
        Ok(())
    }
}

/// Build a summary from already parsed records.
///
/// A malformed record is skipped and does not count towards the provider;
/// its position and error are returned next to the summary.
pub fn summarize(
    records: Vec<serde_json::Value>,
    ctx: &ImageContext<'_>,
) -> (RegistrySummary, Vec<(usize, DeployError)>) {
    let mut summary = RegistrySummary::default();
    let mut skipped = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        if let Err(e) = summary.add(record, ctx) {
            skipped.push((index, e));
        }
    }
    (summary, skipped)
}

fn read_records(path: &Path) -> Result<Vec<serde_json::Value>> {
    let contents = fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents)?;
    Ok(records)
}

/// Load the credentials file at `path`.
///
/// Never fails: a missing or unparsable file yields an empty summary and a
/// malformed record is left out, both logged, so the deployment can still
/// be reported.
pub fn load(path: &Path, ctx: &ImageContext<'_>) -> RegistrySummary {
    let records = match read_records(path) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load registry credentials file");
            return RegistrySummary::default();
        }
    };

    let (summary, skipped) = summarize(records, ctx);
    for (index, e) in skipped {
        warn!(
            path = %path.display(),
            index,
            error = %e,
            "Skipping malformed registry credential"
        );
    }
    summary
}
