pub mod collaborators;
pub mod compress;
pub mod config;
pub mod eligibility;
pub mod load_config;
pub mod ship;
pub mod store;
pub mod walker;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
    name = "buildlog-archiver",
    version,
    about = "Ship today's build logs to object storage and list repository collaborators with read access"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload today's build logs from the local tree to the configured bucket
    Ship {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Print collaborators with pull access on a GitHub repository
    Collaborators {
        /// Repository owner (user or organisation)
        owner: String,
        /// Repository name
        repo: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Ship { config } => {
            let config = load_config::load_config(config)?;
            let store = store::S3Store::new_from_env(&config.bucket).await;
            println!("Shipping build logs...");
            let report = ship::ship(&config, &store).await?;
            for line in report.transcript() {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Collaborators { owner, repo } => {
            let creds = collaborators::Credentials::new_from_env()?;
            let readers = collaborators::list_pull_collaborators(&owner, &repo, &creds).await?;
            for login in readers {
                println!("{login}");
            }
            Ok(())
        }
    }
}
