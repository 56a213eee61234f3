//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod catalog;
mod deploy;
mod profiles;

pub use catalog::CatalogCommands;
pub use deploy::DeployArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start an application process and attach the deployment report
    Deploy(DeployArgs),
    /// Browse the server catalog
    Catalog {
        /// Server profile to query
        #[arg(short, long, env = "FLOWDEPLOY_CONFIGURATION")]
        configuration: String,

        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// List configured server profiles
    Profiles,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy_command(args, config).await,
        Commands::Catalog {
            configuration,
            command,
        } => catalog::handle_catalog_command(command, &configuration, config).await,
        Commands::Profiles => profiles::list_profiles(config),
    }
}
