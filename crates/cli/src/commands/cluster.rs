//! Create and delete cluster commands

use crate::config::ClusterConfig;
use crate::driver::Driver;
use crate::provider::LocalProvider;
use crate::report;
use miette::IntoDiagnostic;
use std::path::Path;
use strata_core::Capability;
use strata_engine::{execute, TaskResult, TaskTree};
use strata_provision::PollConfig;
use tokio_util::sync::CancellationToken;

fn driver() -> Driver {
    let provider = LocalProvider::new();
    Driver::new(
        provider.stacks(),
        provider.identity(),
        vec![Capability::Iam, Capability::NamedIam, Capability::AutoExpand],
        PollConfig::default(),
    )
}

pub async fn create(config_path: &Path) -> miette::Result<()> {
    let config = ClusterConfig::load(config_path).into_diagnostic()?;
    tracing::info!(cluster = %config.metadata.name, "creating cluster");
    let tree = driver().create_cluster_tree(&config);
    run(tree, &format!("cluster \"{}\" created", config.metadata.name)).await
}

pub async fn delete(config_path: &Path) -> miette::Result<()> {
    let config = ClusterConfig::load(config_path).into_diagnostic()?;
    tracing::info!(cluster = %config.metadata.name, "deleting cluster");
    let tree = driver().delete_cluster_tree(&config);
    run(tree, &format!("cluster \"{}\" deleted", config.metadata.name)).await
}

async fn run(tree: TaskTree, success_message: &str) -> miette::Result<()> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling remaining tasks");
                cancel.cancel();
            }
        });
    }

    match execute(tree, cancel).await {
        TaskResult::Success => {
            println!("{success_message}");
            Ok(())
        }
        TaskResult::Failure(failure) => {
            eprint!("{}", report::render(&failure));
            Err(miette::miette!(
                "{} task(s) failed ({})",
                failure.leaf_count(),
                failure.kind()
            ))
        }
    }
}
