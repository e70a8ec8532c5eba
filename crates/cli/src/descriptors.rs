//! Stack descriptors derived from the cluster configuration
//!
//! This is the boundary to the resource-template builder: the documents
//! built here mirror what a full template model would emit, reduced to
//! the resources the driver provisions. Output values use template
//! references resolved by the provisioning side.

use crate::config::{ClusterConfig, NodeGroupConfig};
use serde_json::json;
use strata_core::{Capability, StackDescriptor};

pub fn control_plane(config: &ClusterConfig) -> StackDescriptor {
    let document = json!({
        "resources": {
            "controlPlane": {
                "kind": "ControlPlane",
                "name": config.metadata.name,
                "region": config.metadata.region,
            },
            "serviceRole": {
                "kind": "Role",
                "assumedBy": "control-plane",
            },
        },
        "outputs": {
            "endpoint": "${controlPlane.endpoint}",
            "serviceRoleArn": "${serviceRole.arn}",
        },
    });
    StackDescriptor::new(config.control_plane_stack_name(), document)
        .with_capabilities(vec![Capability::Iam])
}

pub fn nodegroup(config: &ClusterConfig, nodegroup: &NodeGroupConfig) -> StackDescriptor {
    let document = json!({
        "resources": {
            "nodeRole": {
                "kind": "Role",
                "assumedBy": "nodes",
            },
            "nodeGroup": {
                "kind": "NodeGroup",
                "cluster": config.metadata.name,
                "instanceType": nodegroup.instance_type,
                "desiredCapacity": nodegroup.desired_capacity,
            },
        },
        "outputs": {
            "nodeRoleArn": "${nodeRole.arn}",
        },
    });
    StackDescriptor::new(config.nodegroup_stack_name(&nodegroup.name), document)
        .with_capabilities(vec![Capability::Iam])
        .with_depends_on(vec![config.control_plane_stack_name()])
}
