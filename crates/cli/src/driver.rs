//! Orchestration driver: assembles task trees from the cluster
//! configuration
//!
//! Ordering requirements live here, in the shape of the tree: node group
//! stacks provision in parallel with each other but only after the
//! control plane is active, and tear down before it. Two tasks targeting
//! the same stack name are never placed in the same parallel node.

use crate::config::ClusterConfig;
use crate::descriptors;
use std::sync::Arc;
use strata_core::{Capability, Error, StackName, StackStatus};
use strata_engine::{Task, TaskTree};
use strata_provision::{poll, IdentityApi, PollConfig, StackApi, StackManager};

pub struct Driver {
    manager: StackManager,
    stacks: Arc<dyn StackApi>,
    identity: Arc<dyn IdentityApi>,
    poll: PollConfig,
}

impl Driver {
    pub fn new(
        stacks: Arc<dyn StackApi>,
        identity: Arc<dyn IdentityApi>,
        granted: Vec<Capability>,
        poll: PollConfig,
    ) -> Self {
        Self {
            manager: StackManager::new(Arc::clone(&stacks), granted, poll),
            stacks,
            identity,
            poll,
        }
    }

    /// Control plane first, then all node groups in parallel, then a
    /// best-effort outputs probe for the operator.
    pub fn create_cluster_tree(&self, config: &ClusterConfig) -> TaskTree {
        let control_plane = descriptors::control_plane(config);
        let control_plane_name = control_plane.name.clone();

        let mut tree = TaskTree::sequential()
            .with(self.manager.create_stack(control_plane))
            .with(self.wait_for_active(control_plane_name.clone()));

        if !config.node_groups.is_empty() {
            let mut groups = TaskTree::parallel();
            for nodegroup in &config.node_groups {
                groups.append(
                    self.manager
                        .create_stack(descriptors::nodegroup(config, nodegroup)),
                );
            }
            tree.append(groups);
        }

        tree.append(self.outputs_probe(control_plane_name));
        tree
    }

    /// Node groups tear down in parallel, then the identity binding, then
    /// the control plane stack.
    pub fn delete_cluster_tree(&self, config: &ClusterConfig) -> TaskTree {
        let mut tree = TaskTree::sequential();

        if !config.node_groups.is_empty() {
            let mut groups = TaskTree::parallel();
            for nodegroup in &config.node_groups {
                groups.append(
                    self.manager
                        .delete_stack(config.nodegroup_stack_name(&nodegroup.name)),
                );
            }
            tree.append(groups);
        }

        tree.append(self.delete_role_binding(config));
        tree.append(self.manager.delete_stack(config.control_plane_stack_name()));
        tree
    }

    /// Wait until the control plane's stack settles in a *Complete state.
    /// The stack manager already polled the create to terminal; this
    /// second check covers the adopt path, where the stack pre-existed
    /// and may still be mid-flight from an earlier invocation.
    fn wait_for_active(&self, name: StackName) -> Task {
        let api = Arc::clone(&self.stacks);
        let poll_config = self.poll;
        let description = format!("wait for control plane \"{name}\" to be active");
        Task::new(description, move |cancel| async move {
            let check_name = name.clone();
            let status = poll(
                "wait_for_active",
                &poll_config,
                &cancel,
                move || {
                    let api = Arc::clone(&api);
                    let name = check_name.clone();
                    async move {
                        Ok(match api.describe_stack(&name).await? {
                            Some(detail) => detail.status,
                            None => StackStatus::NotFound,
                        })
                    }
                },
                |status: &StackStatus| status.is_terminal() || *status == StackStatus::NotFound,
            )
            .await?;

            if status.is_complete() {
                Ok(())
            } else {
                Err(Error::conflict(
                    name,
                    format!("control plane is {status}, not active"),
                ))
            }
        })
    }

    /// Best-effort: surface the stack outputs in the logs. Failure here
    /// never fails the create flow.
    fn outputs_probe(&self, name: StackName) -> Task {
        let manager = self.manager.clone();
        let description = format!("probe outputs of stack \"{name}\"");
        Task::informational(description, move |_| async move {
            let outputs = manager
                .fetch_outputs(&name)
                .await
                .map_err(|error| Error::informational(error.to_string()))?;
            for (key, value) in &outputs {
                tracing::info!(stack = %name, output = %key, value = %value, "stack output");
            }
            Ok(())
        })
    }

    /// Direct single-resource API call, wrapped exactly like a stack task.
    fn delete_role_binding(&self, config: &ClusterConfig) -> Task {
        let identity = Arc::clone(&self.identity);
        let binding = config.role_binding_name();
        let description = format!("delete role binding \"{binding}\"");
        Task::new(description, move |_| async move {
            identity.delete_role_binding(&binding).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClusterMetadata, NodeGroupConfig};
    use crate::provider::LocalProvider;
    use std::time::Duration;
    use strata_engine::execute;
    use strata_provision::Backoff;
    use tokio_util::sync::CancellationToken;

    fn demo_config() -> ClusterConfig {
        ClusterConfig {
            metadata: ClusterMetadata {
                name: "demo".to_owned(),
                region: "eu-west-1".to_owned(),
            },
            node_groups: vec![
                NodeGroupConfig {
                    name: "workers-a".to_owned(),
                    instance_type: "m5.large".to_owned(),
                    desired_capacity: 3,
                },
                NodeGroupConfig {
                    name: "workers-b".to_owned(),
                    instance_type: "m5.xlarge".to_owned(),
                    desired_capacity: 2,
                },
            ],
        }
    }

    fn fast_driver(provider: &LocalProvider) -> Driver {
        Driver::new(
            provider.stacks(),
            provider.identity(),
            vec![Capability::Iam, Capability::NamedIam],
            PollConfig {
                interval: Duration::from_millis(1),
                timeout: Duration::from_secs(5),
                backoff: Backoff::Fixed,
                max_transient_failures: 3,
            },
        )
    }

    #[test]
    fn create_plan_orders_control_plane_before_nodegroups() {
        let provider = LocalProvider::new();
        let driver = fast_driver(&provider);
        let plan = driver.create_cluster_tree(&demo_config()).describe();

        let control_plane = plan.find("create stack \"strata-demo-cluster\"").unwrap();
        let parallel = plan.find("2 parallel sub-task(s)").unwrap();
        let nodegroup = plan
            .find("create stack \"strata-demo-nodegroup-workers-a\"")
            .unwrap();
        assert!(control_plane < parallel);
        assert!(parallel < nodegroup);
        assert!(plan.contains("probe outputs of stack \"strata-demo-cluster\" (best-effort)"));
    }

    #[tokio::test]
    async fn create_then_delete_round_trip_succeeds() {
        let provider = LocalProvider::new();
        let driver = fast_driver(&provider);
        let config = demo_config();

        let created = execute(
            driver.create_cluster_tree(&config),
            CancellationToken::new(),
        )
        .await;
        assert!(created.is_success());

        let deleted = execute(
            driver.delete_cluster_tree(&config),
            CancellationToken::new(),
        )
        .await;
        assert!(deleted.is_success());

        // delete again: every stack task tolerates "not found"
        let deleted_again = execute(
            driver.delete_cluster_tree(&config),
            CancellationToken::new(),
        )
        .await;
        assert!(deleted_again.is_success());
    }
}
