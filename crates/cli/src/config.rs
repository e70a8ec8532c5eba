//! Declarative cluster configuration
//!
//! Only the fields the orchestration driver needs; the full configuration
//! schema lives with the template builder, not here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{Error, Result, StackName};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub metadata: ClusterMetadata,
    #[serde(default)]
    pub node_groups: Vec<NodeGroupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroupConfig {
    pub name: String,
    pub instance_type: String,
    pub desired_capacity: u32,
}

impl ClusterConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| Error::file_system(path, "read", source))?;
        serde_json::from_str(&raw).map_err(|source| {
            Error::json(
                format!("parsing cluster config '{}'", path.display()),
                source,
            )
        })
    }

    /// Stack names are derived from the cluster name, so one cluster's
    /// stacks never collide with another's in the same environment.
    #[must_use]
    pub fn control_plane_stack_name(&self) -> StackName {
        StackName::new(format!("strata-{}-cluster", self.metadata.name))
    }

    #[must_use]
    pub fn nodegroup_stack_name(&self, nodegroup: &str) -> StackName {
        StackName::new(format!("strata-{}-nodegroup-{nodegroup}", self.metadata.name))
    }

    #[must_use]
    pub fn role_binding_name(&self) -> String {
        format!("strata-{}-admin", self.metadata.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "metadata": {{"name": "demo", "region": "eu-west-1"}},
                "nodeGroups": [
                    {{"name": "workers", "instanceType": "m5.large", "desiredCapacity": 3}}
                ]
            }}"#
        )
        .unwrap();

        let config = ClusterConfig::load(file.path()).unwrap();
        assert_eq!(config.metadata.name, "demo");
        assert_eq!(config.node_groups.len(), 1);
        assert_eq!(
            config.control_plane_stack_name().as_str(),
            "strata-demo-cluster"
        );
        assert_eq!(
            config.nodegroup_stack_name("workers").as_str(),
            "strata-demo-nodegroup-workers"
        );
    }

    #[test]
    fn missing_file_is_a_file_system_error() {
        let error = ClusterConfig::load(Path::new("/does/not/exist.json")).unwrap_err();
        assert_eq!(error.kind(), strata_core::ErrorKind::ValidationFailed);
    }
}
