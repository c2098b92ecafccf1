//! Container registry credentials and naming

pub mod credentials;
pub mod naming;

use serde::Deserialize;

/// Cloud provider behind a container registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    Acr,
    Ecr,
    DockerHub,
    Gcp,
}

impl CloudProvider {
    /// Label used in the credentials file
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Acr => "ACR",
            CloudProvider::Ecr => "ECR",
            CloudProvider::DockerHub => "DOCKER_HUB",
            CloudProvider::Gcp => "GCP",
        }
    }
}

/// Registry type as written in a credential record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RegistryType {
    #[serde(rename = "ACR")]
    Acr,
    #[serde(rename = "ECR")]
    Ecr,
    #[serde(rename = "DOCKER_HUB")]
    DockerHub,
    #[serde(rename = "GCP")]
    Gcp,
    #[serde(other)]
    Unknown,
}

impl RegistryType {
    /// Provider this registry type selects, if it is a known one
    pub fn provider(&self) -> Option<CloudProvider> {
        match self {
            RegistryType::Acr => Some(CloudProvider::Acr),
            RegistryType::Ecr => Some(CloudProvider::Ecr),
            RegistryType::DockerHub => Some(CloudProvider::DockerHub),
            RegistryType::Gcp => Some(CloudProvider::Gcp),
            RegistryType::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_type_parsing() {
        let parsed: Vec<RegistryType> =
            serde_json::from_str(r#"["ACR", "ECR", "DOCKER_HUB", "GCP", "QUAY"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                RegistryType::Acr,
                RegistryType::Ecr,
                RegistryType::DockerHub,
                RegistryType::Gcp,
                RegistryType::Unknown,
            ]
        );
        assert_eq!(RegistryType::Unknown.provider(), None);
        assert_eq!(RegistryType::Gcp.provider(), Some(CloudProvider::Gcp));
    }

    #[test]
    fn test_provider_labels() {
        assert_eq!(CloudProvider::DockerHub.as_str(), "DOCKER_HUB");
        assert_eq!(CloudProvider::Ecr.as_str(), "ECR");
    }
}
