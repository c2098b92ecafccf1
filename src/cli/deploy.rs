//! Deployment notification pipeline: load, extract, build, send

use crate::api::client::DeployClient;
use crate::api::payload::DeploymentRequest;
use crate::config::DeployConfig;
use crate::manifest::ports;
use crate::registry::credentials;
use clap::Args;
use tracing::info;

/// Action inputs and runner environment
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Base URL of the Choreo API
    #[arg(long, env = "INPUT_DOMAIN")]
    pub domain: Option<String>,

    /// Organization id
    #[arg(long, env = "INPUT_ORG-ID")]
    pub org_id: Option<String>,

    /// Project id
    #[arg(long, env = "INPUT_PROJECT-ID")]
    pub project_id: Option<String>,

    /// Component (app) id
    #[arg(long, env = "INPUT_APP-ID")]
    pub app_id: Option<String>,

    /// Environment id
    #[arg(long, env = "INPUT_ENV-ID")]
    pub env_id: Option<String>,

    /// API version id
    #[arg(long, env = "INPUT_VERSION")]
    pub api_version: Option<String>,

    /// Image name
    #[arg(long, env = "INPUT_IMAGE-NAME")]
    pub image_name: Option<String>,

    /// Source commit the image was built from
    #[arg(long, env = "INPUT_GIT-HASH")]
    pub git_hash: Option<String>,

    /// Commit of the generated gitops manifests
    #[arg(long, env = "INPUT_GITOPS-HASH")]
    pub gitops_hash: Option<String>,

    /// Registry token, passed through to the API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log the request before sending it (true/false)
    #[arg(long, env = "INPUT_DEBUG")]
    pub debug: Option<String>,

    /// Whether the app serves HTTP (true/false)
    #[arg(long, env = "INPUT_IS-HTTP-BASED")]
    pub is_http_based: Option<String>,

    /// Manifest stream to read Service ports from
    #[arg(long, env = "INPUT_PORT-EXTRACT-FILE-PATH")]
    pub port_extract_file_path: Option<String>,

    /// Container id for pre-built container deployments
    #[arg(long, env = "INPUT_CONTAINER-ID")]
    pub container_id: Option<String>,

    /// Deploy a pre-built container instead of a source build (true/false)
    #[arg(long, env = "INPUT_IS-CONTAINER-DEPLOYMENT")]
    pub is_container_deployment: Option<String>,

    /// OpenAPI definition path of the container
    #[arg(long, env = "INPUT_OAS-FILE-PATH")]
    pub oas_file_path: Option<String>,

    /// Commit timestamp of the source commit
    #[arg(long, env = "INPUT_GIT-HASH-DATE")]
    pub git_hash_date: Option<String>,

    /// Whether this deployment was triggered automatically (true/false)
    #[arg(long, env = "INPUT_IS-AUTO-DEPLOY")]
    pub is_auto_deploy: Option<String>,

    /// Workflow run id
    #[arg(long, env = "INPUT_RUN-ID")]
    pub run_id: Option<String>,

    /// Organization UUID
    #[arg(long, env = "INPUT_ORGANIZATIONUUID")]
    pub organization_uuid: Option<String>,

    /// Gitops repository checked out in the workspace
    #[arg(long, env = "CHOREO_GITOPS_REPO")]
    pub gitops_repo: Option<String>,

    /// Registry credentials file name inside the gitops repository
    #[arg(long, env = "REG_CRED_FILE_NAME")]
    pub credentials_file_name: Option<String>,

    /// Commit SHA the pushed images are tagged with
    #[arg(long, env = "NEW_SHA")]
    pub new_sha: Option<String>,

    /// Runner workspace root
    #[arg(long, env = "CHOREO_WORKSPACE_ROOT")]
    pub workspace_root: Option<String>,
}

/// Execute the deployment notification
pub async fn execute(args: DeployArgs) -> anyhow::Result<()> {
    let config = DeployConfig::from_args(&args)?;

    let registry = credentials::load(&config.credentials_path(), &config.image_context());
    info!(
        provider = registry.provider.map_or("none", |p| p.as_str()),
        registries = registry.cluster_image_tags.len(),
        "Loaded registry credentials"
    );

    let extraction = if config.container_deployment {
        None
    } else {
        let extraction = ports::extract(&config.port_extract_file_path, config.http_based);
        info!(
            ports = extraction.ports.len(),
            manifest = %extraction.manifest_path,
            "Extracted service ports"
        );
        Some(extraction)
    };

    let request = DeploymentRequest::build(&config, registry, extraction);
    let client = DeployClient::new(&config.domain)?;

    if config.debug {
        info!(
            body = %serde_json::to_string(&request)?,
            url = ?client.endpoint(&request),
            "Prepared deployment request"
        );
    }

    client.deploy(&request).await?;
    Ok(())
}
