//! Dry-run plan rendering

use crate::config::ClusterConfig;
use crate::driver::Driver;
use crate::provider::LocalProvider;
use miette::IntoDiagnostic;
use std::path::Path;
use strata_core::Capability;
use strata_provision::PollConfig;

pub fn execute(config_path: &Path) -> miette::Result<()> {
    let config = ClusterConfig::load(config_path).into_diagnostic()?;
    let provider = LocalProvider::new();
    let driver = Driver::new(
        provider.stacks(),
        provider.identity(),
        vec![Capability::Iam, Capability::NamedIam, Capability::AutoExpand],
        PollConfig::default(),
    );

    println!("create cluster \"{}\":", config.metadata.name);
    print!("{}", indent(&driver.create_cluster_tree(&config).describe()));
    println!();
    println!("delete cluster \"{}\":", config.metadata.name);
    print!("{}", indent(&driver.delete_cluster_tree(&config).describe()));
    Ok(())
}

fn indent(plan: &str) -> String {
    plan.lines()
        .map(|line| format!("    {line}\n"))
        .collect()
}
