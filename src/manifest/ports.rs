//! Service port extraction from Kubernetes manifests

use crate::storage::paths::prepared_path;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, warn};

/// Port assumed for HTTP apps whose manifests declare no Service
pub const DEFAULT_HTTP_PORT: u16 = 8090;

/// Name of the synthetic default port entry
pub const DEFAULT_HTTP_PORT_NAME: &str = "port-1-default";

/// A port exposed by the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPort {
    pub port: u16,
    #[serde(default)]
    pub name: String,
}

impl ExtractedPort {
    pub fn default_http() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            name: DEFAULT_HTTP_PORT_NAME.to_string(),
        }
    }
}

/// Ports found for a deployment, and the manifest path they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortExtraction {
    pub ports: Vec<ExtractedPort>,
    /// Path that was read, or the lower-cased variant when neither could be read
    pub manifest_path: String,
}

/// Extract ports from the manifest stream at `path`.
///
/// Read and parse failures are logged and never abort; an HTTP app that ends
/// up without ports gets the default port entry.
pub fn extract(path: &str, http_based: bool) -> PortExtraction {
    let mut ports = Vec::new();

    let manifest_path = match read_manifest(path) {
        Ok((contents, resolved)) => {
            if let Err(e) = collect_service_ports(&contents, &mut ports) {
                warn!(path = %resolved, error = %e, "Failed to parse manifest");
            }
            resolved
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to read manifest");
            prepared_path(path)
        }
    };

    if ports.is_empty() && http_based {
        debug!(port = DEFAULT_HTTP_PORT, "No service ports declared, using default");
        ports.push(ExtractedPort::default_http());
    }

    PortExtraction {
        ports,
        manifest_path,
    }
}

/// Read the manifest as given, falling back to the lower-cased file name
fn read_manifest(path: &str) -> Result<(String, String)> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok((contents, path.to_string())),
        Err(e) => {
            let prepared = prepared_path(path);
            debug!(path = %path, error = %e, fallback = %prepared, "Trying lower-cased manifest path");
            let contents = fs::read_to_string(&prepared)?;
            Ok((contents, prepared))
        }
    }
}

/// Append the `spec.ports` of every `Service` document in a YAML stream.
///
/// Ports found before a parse error stay in `ports`.
pub fn collect_service_ports(contents: &str, ports: &mut Vec<ExtractedPort>) -> Result<()> {
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.get("kind").and_then(|kind| kind.as_str()) != Some("Service") {
            continue;
        }

        let Some(entries) = value.get("spec").and_then(|spec| spec.get("ports")) else {
            continue;
        };
        let service_ports: Vec<ExtractedPort> = serde_yaml::from_value(entries.clone())?;
        ports.extend(service_ports);
    }
    Ok(())
}
