//! Deployment request bodies

use crate::config::DeployConfig;
use crate::manifest::ports::{ExtractedPort, PortExtraction};
use crate::registry::credentials::{ClusterImageTag, RegistrySummary};
use crate::registry::naming::{resolve_image_name, resolve_image_tag};
use serde::Serialize;

/// Fields sent with every deployment request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommonFields {
    pub image: String,
    pub tag: String,
    pub git_hash: String,
    pub gitops_hash: String,
    pub app_id: String,
    pub api_version_id: String,
    pub environment_id: String,
    pub registry_token: String,
    pub cluster_image_tags: Vec<ClusterImageTag>,
    pub git_hash_commit_timestamp: String,
    pub is_auto_deploy: bool,
    pub run_id: String,
}

/// Deployment of an image built from the app's source
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceDeployment {
    #[serde(flatten)]
    pub common: CommonFields,
    pub image_ports: Vec<ExtractedPort>,
    pub organization_id: String,
    pub project_id: String,
    pub workspace_yaml_path: String,
}

/// Deployment of a pre-built container (BYOC)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContainerDeployment {
    #[serde(flatten)]
    pub common: CommonFields,
    pub container_id: String,
    pub api_definition_path: String,
}

/// Body of the request posted to the deployment API
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DeploymentRequest {
    Source(SourceDeployment),
    Container(ContainerDeployment),
}

impl DeploymentRequest {
    /// Assemble the request for this run.
    ///
    /// `ports` is ignored for container deployments; a source deployment
    /// without an extraction result reports no ports.
    pub fn build(
        config: &DeployConfig,
        registry: RegistrySummary,
        ports: Option<PortExtraction>,
    ) -> Self {
        let common = CommonFields {
            image: resolve_image_name(
                &config.image_name,
                registry.provider,
                &config.organization_uuid,
            ),
            tag: resolve_image_tag(registry.provider, &config.image_name, &config.git_hash),
            git_hash: config.git_hash.clone(),
            gitops_hash: config.gitops_hash.clone(),
            app_id: config.app_id.clone(),
            api_version_id: config.api_version_id.clone(),
            environment_id: config.environment_id.clone(),
            registry_token: config.token.clone(),
            cluster_image_tags: registry.cluster_image_tags,
            git_hash_commit_timestamp: config.git_hash_date.clone(),
            is_auto_deploy: config.auto_deploy,
            run_id: config.run_id.clone(),
        };

        if config.container_deployment {
            return DeploymentRequest::Container(ContainerDeployment {
                common,
                container_id: config.container_id.clone(),
                api_definition_path: config.oas_file_path.clone(),
            });
        }

        let PortExtraction {
            ports,
            manifest_path,
        } = ports.unwrap_or_else(|| PortExtraction {
            ports: Vec::new(),
            manifest_path: config.port_extract_file_path.clone(),
        });

        DeploymentRequest::Source(SourceDeployment {
            common,
            image_ports: ports,
            organization_id: config.organization_id.clone(),
            project_id: config.project_id.clone(),
            workspace_yaml_path: manifest_path,
        })
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            DeploymentRequest::Source(req) => &req.common,
            DeploymentRequest::Container(req) => &req.common,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, DeploymentRequest::Container(_))
    }

    pub fn registry_token(&self) -> &str {
        &self.common().registry_token
    }
}
