//! Deploy application workflow
//!
//! One sequential attempt per pipeline run: resolve parameters, start the
//! process, read back its metadata, then attach a correlated report.
//! Nothing is retried.

use flowdeploy_client::ProcessApi;
use flowdeploy_core::domain::report::DeploymentReport;
use flowdeploy_core::domain::request::{DeploymentRequest, DeploymentTarget};
use flowdeploy_core::resolver::resolve_parameters;
use flowdeploy_core::{DeployError, Result};
use tracing::{error, info, warn};

use super::run::RunContext;

/// Run the deploy step and report whether it succeeded
///
/// Every error is caught here: it is written to the operational log with
/// full detail, echoed as one line on the run log, and turned into `false`.
/// No report is attached unless the whole attempt succeeded.
///
/// # Arguments
/// * `client` - Server the process is started on
/// * `target` - Project, application, process and environment
/// * `deploy_parameters` - Serialized deploy-parameters document
/// * `run` - Log stream and report sink of the pipeline run
pub async fn run_deploy<C, R>(
    client: &C,
    target: &DeploymentTarget,
    deploy_parameters: &str,
    run: &mut R,
) -> bool
where
    C: ProcessApi + ?Sized,
    R: RunContext + ?Sized,
{
    run.log_line(&target.to_string());

    match deploy(client, target, deploy_parameters, run).await {
        Ok(report) => {
            info!(
                "Deployed application '{}': process {}, job {}",
                report.application_name, report.process_id, report.job_id
            );
            true
        }
        Err(err) => {
            error!(error = ?err, "Deploy application failed: {}", err);
            if err.after_remote_effect() {
                // The server may already be running the process.
                warn!(
                    "Process '{}' of application '{}' may have started despite the failure",
                    target.application_process_name, target.application_name
                );
            }
            run.log_line(&err.to_string());
            false
        }
    }
}

async fn deploy<C, R>(
    client: &C,
    target: &DeploymentTarget,
    deploy_parameters: &str,
    run: &mut R,
) -> Result<DeploymentReport>
where
    C: ProcessApi + ?Sized,
    R: RunContext + ?Sized,
{
    target.validate()?;
    let parameters = resolve_parameters(deploy_parameters)?;
    let request = DeploymentRequest::new(target.clone(), parameters)?;

    run.log_line("Preparing to run process...");

    let invocation = client
        .start_process(&request)
        .await
        .map_err(DeployError::remote)?;

    let metadata = client
        .get_process_metadata(
            &target.project_name,
            &target.application_name,
            &target.application_process_name,
        )
        .await
        .map_err(DeployError::remote)?
        .ok_or_else(|| DeployError::Correlation {
            application: target.application_name.clone(),
            process: target.application_process_name.clone(),
        })?;

    let report = DeploymentReport::new(
        client.server_url(),
        target,
        &invocation,
        &metadata,
        request.into_parameters(),
    );

    run.attach_report(&report)
        .map_err(|e| DeployError::Report(e.to_string()))?;

    run.log_line(&format!(
        "Deploy application result: {}",
        invocation.to_pretty_json()
    ));
    run.log_line(&report.summary_line());

    Ok(report)
}
