//! Flowdeploy CLI
//!
//! Pipeline step that starts an application deployment on a
//! release-orchestration server and attaches a correlated report to the run.

mod commands;
mod config;
mod service;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowdeploy")]
#[command(about = "Deploy applications through a release-orchestration server", long_about = None)]
struct Cli {
    /// Server profiles file
    #[arg(
        long,
        env = "FLOWDEPLOY_PROFILES",
        default_value = "flowdeploy-profiles.json"
    )]
    profiles: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Operational log goes to stderr; stdout is the run log.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowdeploy=info,flowdeploy_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        profiles_path: cli.profiles,
    };

    handle_command(cli.command, &config).await
}
