//! Deploy command handler
//!
//! Collects the step inputs from flags, environment and an optional step
//! file, connects to the selected server and runs the deploy workflow once.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;
use tracing::info;

use crate::config::{Config, ProfileStore, StepConfig};
use crate::service::{ConsoleRun, run_deploy};

/// Deploy step inputs
///
/// Flags override the values of `--step-file`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// JSON file holding the stored step configuration
    #[arg(long, env = "FLOWDEPLOY_STEP_FILE")]
    step_file: Option<PathBuf>,

    /// Server profile name
    #[arg(short, long, env = "FLOWDEPLOY_CONFIGURATION")]
    configuration: Option<String>,

    /// Project name
    #[arg(short, long, env = "FLOWDEPLOY_PROJECT")]
    project: Option<String>,

    /// Application name
    #[arg(short, long, env = "FLOWDEPLOY_APPLICATION")]
    application: Option<String>,

    /// Application process name
    #[arg(long, env = "FLOWDEPLOY_PROCESS")]
    process: Option<String>,

    /// Environment name
    #[arg(short, long, env = "FLOWDEPLOY_ENVIRONMENT")]
    environment: Option<String>,

    /// Deploy-parameters document (JSON text)
    #[arg(long, env = "FLOWDEPLOY_PARAMETERS", conflicts_with = "parameters_file")]
    parameters: Option<String>,

    /// File containing the deploy-parameters document
    #[arg(long)]
    parameters_file: Option<PathBuf>,

    /// Directory the deployment report is written to
    #[arg(long, env = "FLOWDEPLOY_REPORT_DIR", default_value = ".")]
    report_dir: PathBuf,
}

impl DeployArgs {
    /// Merge flags over the step file
    fn into_step(self) -> Result<(StepConfig, PathBuf)> {
        let mut step = match &self.step_file {
            Some(path) => StepConfig::from_file(path)?,
            None => StepConfig::default(),
        };

        override_with(&mut step.configuration, self.configuration);
        override_with(&mut step.project_name, self.project);
        override_with(&mut step.application_name, self.application);
        override_with(&mut step.application_process_name, self.process);
        override_with(&mut step.environment_name, self.environment);
        override_with(&mut step.deploy_parameters, self.parameters);

        if let Some(path) = &self.parameters_file {
            step.deploy_parameters = std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read parameters file: {}", path.display())
            })?;
        }

        Ok((step, self.report_dir))
    }
}

fn override_with(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Handle the deploy command
pub async fn handle_deploy_command(args: DeployArgs, config: &Config) -> Result<()> {
    let (step, report_dir) = args.into_step()?;

    let store = ProfileStore::load(&config.profiles_path)?;
    let profile = store.get(&step.configuration)?;
    info!("Using configuration '{}' ({})", profile.name, profile.url);

    // The client lives for this run only; dropping it closes its connections.
    let client = profile.connect()?;
    let mut run = ConsoleRun::new(report_dir);

    let succeeded = run_deploy(&client, &step.target(), &step.deploy_parameters, &mut run).await;

    if !succeeded {
        println!("{}", "✗ Deploy application failed".red().bold());
        anyhow::bail!("Deploy of application '{}' failed", step.application_name);
    }

    println!("{}", "✓ Deploy application started successfully!".green().bold());
    if let Some(path) = run.attached_report() {
        println!("  Report: {}", path.display().to_string().cyan());
    }

    Ok(())
}
