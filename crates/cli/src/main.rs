//! `strata`: cluster lifecycle orchestration over stack-based
//! provisioning.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod descriptors;
mod driver;
mod provider;
mod report;

use commands::Commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Drive multi-step cluster lifecycle changes against a stack-based provisioning API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(strata_core::STRATA_LOG_VAR)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    cli.command.execute().await
}
