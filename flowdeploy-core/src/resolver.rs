//! Parameter resolver
//!
//! Converts between the operator-edited deploy-parameters document and the
//! ordered parameter list sent to the server. Values are never validated
//! here; the server is the authority on what is legal.

use serde::Deserialize;

use crate::domain::parameter::{ActualParameter, FormalParameter};
use crate::dto::parameters::{DeployParametersDocument, EMPTY_DOCUMENT};
use crate::error::Result;

/// Build a template document with one empty-valued entry per formal parameter
///
/// Catalog order is preserved.
pub fn build_default_request_document(
    application_name: &str,
    application_process_name: &str,
    formal_parameters: &[FormalParameter],
) -> DeployParametersDocument {
    let parameter = formal_parameters
        .iter()
        .map(|formal| ActualParameter::new(formal.name.clone(), ""))
        .collect();

    DeployParametersDocument::new(application_name, application_process_name, parameter)
}

/// Extract the ordered `(name, value)` list from a serialized document
///
/// # Errors
/// Returns `MalformedParameterDocument` when `runProcess.parameter` is
/// missing or has the wrong shape.
pub fn resolve_parameters(document: &str) -> Result<Vec<ActualParameter>> {
    DeployParametersDocument::parse(document).map(DeployParametersDocument::into_parameters)
}

/// Return the previous document if it still targets the selected process
///
/// Reloading the parameter editor must not throw away values the operator
/// already typed, so a non-empty previous document generated for the same
/// application and process is handed back untouched. Anything else (empty,
/// `{}`, unparseable, or for another process) yields `None` and the caller
/// rebuilds from the catalog.
pub fn reusable_document<'a>(
    previous: &'a str,
    application_name: &str,
    application_process_name: &str,
) -> Option<&'a str> {
    let trimmed = previous.trim();
    if trimmed.is_empty() || trimmed == EMPTY_DOCUMENT {
        return None;
    }

    // Only the selection is probed so a half-edited parameter list survives.
    let probe: SelectionProbe = serde_json::from_str(trimmed).ok()?;
    let run_process = probe.run_process?;

    let same_application = run_process.application_name.as_deref() == Some(application_name);
    let same_process =
        run_process.application_process_name.as_deref() == Some(application_process_name);

    (same_application && same_process).then_some(previous)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionProbe {
    run_process: Option<ProbedSelection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbedSelection {
    application_name: Option<String>,
    application_process_name: Option<String>,
}
