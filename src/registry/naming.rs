//! Provider-specific image naming rules
//!
//! ECR deployments share a single repository per organization, since
//! per-application repositories cannot be provisioned across the AWS
//! account layout. The application name therefore moves from the
//! repository path into the tag.

use super::CloudProvider;

/// Image name the deployment API should record
pub fn resolve_image_name(
    image_name: &str,
    provider: Option<CloudProvider>,
    organization_uuid: &str,
) -> String {
    match provider {
        Some(CloudProvider::Ecr) => organization_uuid.to_string(),
        _ => image_name.to_string(),
    }
}

/// Image tag the deployment API should record
pub fn resolve_image_tag(
    provider: Option<CloudProvider>,
    image_name: &str,
    git_hash: &str,
) -> String {
    match provider {
        Some(CloudProvider::Ecr) => format!("{}-{}", image_name, git_hash),
        _ => git_hash.to_string(),
    }
}
