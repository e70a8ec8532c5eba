//! Command surface

mod cluster;
mod plan;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Create cluster resources
    Create {
        #[command(subcommand)]
        command: CreateCommands,
    },
    /// Delete cluster resources
    Delete {
        #[command(subcommand)]
        command: DeleteCommands,
    },
    /// Render the execution plan without running anything
    Plan {
        /// Path to the cluster configuration file
        #[arg(short = 'f', long = "config-file")]
        config: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum CreateCommands {
    /// Create a cluster control plane and its node groups
    Cluster {
        /// Path to the cluster configuration file
        #[arg(short = 'f', long = "config-file")]
        config: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum DeleteCommands {
    /// Delete a cluster and everything it owns
    Cluster {
        /// Path to the cluster configuration file
        #[arg(short = 'f', long = "config-file")]
        config: PathBuf,
    },
}

impl Commands {
    pub async fn execute(self) -> miette::Result<()> {
        match self {
            Commands::Create { command } => match command {
                CreateCommands::Cluster { config } => cluster::create(&config).await,
            },
            Commands::Delete { command } => match command {
                DeleteCommands::Cluster { config } => cluster::delete(&config).await,
            },
            Commands::Plan { config } => plan::execute(&config),
        }
    }
}
