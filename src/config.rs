//! Run configuration assembled from action inputs and runner environment

use crate::cli::deploy::DeployArgs;
use crate::registry::credentials::ImageContext;
use crate::storage::paths::WorkspacePaths;
use crate::{DeployError, Result};
use std::path::PathBuf;

/// Everything one deployment notification needs, validated up front
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub domain: String,
    pub organization_id: String,
    pub project_id: String,
    pub app_id: String,
    pub environment_id: String,
    pub api_version_id: String,
    pub image_name: String,
    pub git_hash: String,
    pub gitops_hash: String,
    pub token: String,
    pub debug: bool,
    pub http_based: bool,
    /// Manifest to read ports from; always set for source deployments
    pub port_extract_file_path: String,
    pub container_id: String,
    pub container_deployment: bool,
    pub oas_file_path: String,
    pub git_hash_date: String,
    pub auto_deploy: bool,
    pub run_id: String,
    pub organization_uuid: String,
    /// Gitops repository identifier (`CHOREO_GITOPS_REPO`)
    pub gitops_repo: String,
    /// Credentials file name inside the gitops checkout (`REG_CRED_FILE_NAME`)
    pub credentials_file_name: String,
    /// Commit SHA the pushed images are tagged with (`NEW_SHA`)
    pub new_sha: String,
    pub paths: WorkspacePaths,
}

impl DeployConfig {
    /// Validate raw inputs into a config
    pub fn from_args(args: &DeployArgs) -> Result<Self> {
        let container_deployment =
            parse_flag("is-container-deployment", args.is_container_deployment.as_deref())?;

        let port_extract_file_path = if container_deployment {
            optional(&args.port_extract_file_path)
        } else {
            required("port-extract-file-path", &args.port_extract_file_path)?
        };

        let paths = match present(&args.workspace_root) {
            Some(root) => WorkspacePaths::with_root(root),
            None => WorkspacePaths::new(),
        };

        Ok(Self {
            domain: required("domain", &args.domain)?
                .trim_end_matches('/')
                .to_string(),
            organization_id: optional(&args.org_id),
            project_id: optional(&args.project_id),
            app_id: required("app-id", &args.app_id)?,
            environment_id: required("env-id", &args.env_id)?,
            api_version_id: optional(&args.api_version),
            image_name: required("image-name", &args.image_name)?,
            git_hash: required("git-hash", &args.git_hash)?,
            gitops_hash: optional(&args.gitops_hash),
            token: optional(&args.token),
            debug: parse_flag("debug", args.debug.as_deref())?,
            http_based: parse_flag("is-http-based", args.is_http_based.as_deref())?,
            port_extract_file_path,
            container_id: optional(&args.container_id),
            container_deployment,
            oas_file_path: optional(&args.oas_file_path),
            git_hash_date: optional(&args.git_hash_date),
            auto_deploy: parse_flag("is-auto-deploy", args.is_auto_deploy.as_deref())?,
            run_id: optional(&args.run_id),
            organization_uuid: optional(&args.organization_uuid),
            gitops_repo: required("CHOREO_GITOPS_REPO", &args.gitops_repo)?,
            credentials_file_name: required("REG_CRED_FILE_NAME", &args.credentials_file_name)?,
            new_sha: required("NEW_SHA", &args.new_sha)?,
            paths,
        })
    }

    /// Location of the registry credentials file
    pub fn credentials_path(&self) -> PathBuf {
        self.paths
            .registry_credentials(&self.gitops_repo, &self.credentials_file_name)
    }

    pub fn image_context(&self) -> ImageContext<'_> {
        ImageContext {
            repo: &self.gitops_repo,
            organization_uuid: &self.organization_uuid,
            new_sha: &self.new_sha,
        }
    }
}

/// Parse a boolean action input; empty or absent means false
pub fn parse_flag(name: &str, value: Option<&str>) -> Result<bool> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(DeployError::InvalidInput {
            name: name.to_string(),
            value: v.to_string(),
        }),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(name: &str, value: &Option<String>) -> Result<String> {
    present(value)
        .map(str::to_string)
        .ok_or_else(|| DeployError::MissingInput(name.to_string()))
}

fn optional(value: &Option<String>) -> String {
    present(value).unwrap_or_default().to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    pub(crate) fn source_args() -> DeployArgs {
        DeployArgs {
            domain: Some("https://api.example.com/".to_string()),
            org_id: Some("org-1".to_string()),
            project_id: Some("proj-1".to_string()),
            app_id: Some("app-1".to_string()),
            env_id: Some("env-1".to_string()),
            api_version: Some("v1".to_string()),
            image_name: Some("orders-api".to_string()),
            git_hash: Some("abc123".to_string()),
            gitops_hash: Some("def456".to_string()),
            token: Some("token".to_string()),
            debug: Some("false".to_string()),
            is_http_based: Some("true".to_string()),
            port_extract_file_path: Some("k8s/Service.yaml".to_string()),
            container_id: None,
            is_container_deployment: Some("false".to_string()),
            oas_file_path: None,
            git_hash_date: Some("2024-01-01T00:00:00Z".to_string()),
            is_auto_deploy: Some("true".to_string()),
            run_id: Some("42".to_string()),
            organization_uuid: Some("org-uuid".to_string()),
            gitops_repo: Some("orders-app".to_string()),
            credentials_file_name: Some("creds.json".to_string()),
            new_sha: Some("deadbeef".to_string()),
            workspace_root: Some("/tmp/workspace".to_string()),
        }
    }

    #[test]
    fn test_from_args() {
        let config = DeployConfig::from_args(&source_args()).unwrap();

        assert_eq!(config.domain, "https://api.example.com");
        assert!(config.http_based);
        assert!(config.auto_deploy);
        assert!(!config.container_deployment);
        assert_eq!(config.container_id, "");
        assert_eq!(
            config.credentials_path(),
            Path::new("/tmp/workspace/orders-app/creds.json")
        );
        assert_eq!(config.image_context().new_sha, "deadbeef");
    }

    #[test]
    fn test_missing_required_input() {
        let mut args = source_args();
        args.git_hash = Some("  ".to_string());

        let err = DeployConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, DeployError::MissingInput(ref name) if name == "git-hash"));
    }

    #[test]
    fn test_manifest_path_only_required_for_source_deployments() {
        let mut args = source_args();
        args.port_extract_file_path = None;
        assert!(matches!(
            DeployConfig::from_args(&args),
            Err(DeployError::MissingInput(_))
        ));

        args.is_container_deployment = Some("true".to_string());
        let config = DeployConfig::from_args(&args).unwrap();
        assert!(config.container_deployment);
        assert_eq!(config.port_extract_file_path, "");
    }

    #[test]
    fn test_default_workspace_root() {
        let mut args = source_args();
        args.workspace_root = None;

        let config = DeployConfig::from_args(&args).unwrap();
        assert_eq!(
            config.credentials_path(),
            Path::new("/home/runner/workspace/orders-app/creds.json")
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("debug", Some("TRUE")).unwrap());
        assert!(!parse_flag("debug", Some("false")).unwrap());
        assert!(!parse_flag("debug", Some("")).unwrap());
        assert!(!parse_flag("debug", None).unwrap());
        assert!(matches!(
            parse_flag("debug", Some("yes")),
            Err(DeployError::InvalidInput { .. })
        ));
    }
}
