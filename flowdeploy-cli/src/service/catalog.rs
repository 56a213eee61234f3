//! Deploy-parameters template service
//!
//! Produces the document the operator edits for the selected process,
//! keeping an earlier document when it still targets the same process.

use flowdeploy_client::CatalogApi;
use flowdeploy_core::dto::parameters::EMPTY_DOCUMENT;
use flowdeploy_core::resolver::{build_default_request_document, reusable_document};
use tracing::{debug, warn};

/// Current selection in the step editor
#[derive(Debug, Clone, Default)]
pub struct ParameterSelection {
    pub configuration: String,
    pub project_name: String,
    pub application_name: String,
    pub application_process_name: String,
}

impl ParameterSelection {
    fn is_complete(&self) -> bool {
        [
            &self.configuration,
            &self.project_name,
            &self.application_name,
            &self.application_process_name,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }
}

/// Return the deploy-parameters document for the current selection
///
/// - Incomplete selection: `{}`, without contacting the server.
/// - `previous` generated for the same application and process: returned
///   unchanged so typed values survive a reload.
/// - Otherwise: a fresh template from the process's formal parameters.
pub async fn populate_parameters_document<C>(
    catalog: &C,
    selection: &ParameterSelection,
    previous: &str,
) -> flowdeploy_client::Result<String>
where
    C: CatalogApi + ?Sized,
{
    if !selection.is_complete() {
        return Ok(EMPTY_DOCUMENT.to_string());
    }

    if let Some(document) = reusable_document(
        previous,
        &selection.application_name,
        &selection.application_process_name,
    ) {
        debug!("Keeping previous deploy parameters for the selected process");
        return Ok(document.to_string());
    }

    let trimmed = previous.trim();
    if !trimmed.is_empty()
        && trimmed != EMPTY_DOCUMENT
        && serde_json::from_str::<serde_json::Value>(trimmed).is_err()
    {
        warn!("Previous deploy parameters are not valid JSON, rebuilding from catalog");
    }

    let formal_parameters = catalog
        .list_formal_parameters(
            &selection.project_name,
            &selection.application_name,
            &selection.application_process_name,
        )
        .await?;

    Ok(build_default_request_document(
        &selection.application_name,
        &selection.application_process_name,
        &formal_parameters,
    )
    .to_json())
}
