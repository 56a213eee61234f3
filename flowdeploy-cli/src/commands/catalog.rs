//! Catalog command handlers
//!
//! Lists what an operator can pick when configuring a deploy step, and
//! prints the deploy-parameters template for a selected process.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowdeploy_client::CatalogApi;

use crate::config::{Config, ProfileStore};
use crate::service::{ParameterSelection, populate_parameters_document};

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List projects
    Projects,
    /// List applications of a project
    Applications {
        /// Project name
        #[arg(short, long)]
        project: String,
    },
    /// List processes of an application
    Processes {
        /// Project name
        #[arg(short, long)]
        project: String,

        /// Application name
        #[arg(short, long)]
        application: String,
    },
    /// List environments of a project
    Environments {
        /// Project name
        #[arg(short, long)]
        project: String,
    },
    /// Print the deploy-parameters document for a process
    Parameters {
        /// Project name
        #[arg(short, long)]
        project: String,

        /// Application name
        #[arg(short, long)]
        application: String,

        /// Application process name
        #[arg(long)]
        process: String,

        /// Previously edited document; kept if it targets the same process
        #[arg(long, default_value = "")]
        previous: String,
    },
}

/// Handle catalog commands
///
/// # Arguments
/// * `command` - The catalog command to execute
/// * `configuration` - Name of the server profile to query
/// * `config` - The CLI configuration
pub async fn handle_catalog_command(
    command: CatalogCommands,
    configuration: &str,
    config: &Config,
) -> Result<()> {
    let store = ProfileStore::load(&config.profiles_path)?;
    let client = store.get(configuration)?.connect()?;

    match command {
        CatalogCommands::Projects => print_names("project", client.list_projects().await?),
        CatalogCommands::Applications { project } => {
            print_names("application", client.list_applications(&project).await?)
        }
        CatalogCommands::Processes {
            project,
            application,
        } => print_names(
            "process",
            client.list_processes(&project, &application).await?,
        ),
        CatalogCommands::Environments { project } => {
            print_names("environment", client.list_environments(&project).await?)
        }
        CatalogCommands::Parameters {
            project,
            application,
            process,
            previous,
        } => {
            let selection = ParameterSelection {
                configuration: configuration.to_string(),
                project_name: project,
                application_name: application,
                application_process_name: process,
            };
            let document = populate_parameters_document(&client, &selection, &previous).await?;
            println!("{}", document);
        }
    }

    Ok(())
}

/// Print one name per line, or a notice when there are none
fn print_names(kind: &str, names: Vec<String>) {
    if names.is_empty() {
        eprintln!("{}", format!("No {} found.", kind).yellow());
        return;
    }

    for name in names {
        println!("{}", name);
    }
}
