//! Catalog API endpoints
//!
//! Read-only listings used to fill selection widgets and to seed the
//! deploy-parameters template. None of these calls has side effects.

use async_trait::async_trait;
use flowdeploy_core::domain::parameter::FormalParameter;
use serde_json::Value as JsonValue;

use crate::FlowClient;
use crate::error::Result;

/// Read-only catalog lookups
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List project names
    async fn list_projects(&self) -> Result<Vec<String>>;

    /// List application names of a project
    async fn list_applications(&self, project_name: &str) -> Result<Vec<String>>;

    /// List process names of an application
    async fn list_processes(
        &self,
        project_name: &str,
        application_name: &str,
    ) -> Result<Vec<String>>;

    /// List environment names of a project
    async fn list_environments(&self, project_name: &str) -> Result<Vec<String>>;

    /// List the formal parameters a process declares, in declaration order
    async fn list_formal_parameters(
        &self,
        project_name: &str,
        application_name: &str,
        process_name: &str,
    ) -> Result<Vec<FormalParameter>>;
}

impl FlowClient {
    /// GET an endpoint and pull `name_key` out of every entry under `list_key`
    async fn fetch_names(
        &self,
        segments: &[&str],
        list_key: &str,
        name_key: &str,
    ) -> Result<Vec<String>> {
        let url = self.endpoint(segments)?;
        let response = self.get(url).send().await?;
        let body: JsonValue = self.handle_response(response).await?;

        Ok(extract_names(&body, list_key, name_key))
    }
}

#[async_trait]
impl CatalogApi for FlowClient {
    async fn list_projects(&self) -> Result<Vec<String>> {
        self.fetch_names(&["projects"], "project", "projectName").await
    }

    async fn list_applications(&self, project_name: &str) -> Result<Vec<String>> {
        self.fetch_names(
            &["projects", project_name, "applications"],
            "application",
            "applicationName",
        )
        .await
    }

    async fn list_processes(
        &self,
        project_name: &str,
        application_name: &str,
    ) -> Result<Vec<String>> {
        self.fetch_names(
            &[
                "projects",
                project_name,
                "applications",
                application_name,
                "processes",
            ],
            "process",
            "processName",
        )
        .await
    }

    async fn list_environments(&self, project_name: &str) -> Result<Vec<String>> {
        self.fetch_names(
            &["projects", project_name, "environments"],
            "environment",
            "environmentName",
        )
        .await
    }

    async fn list_formal_parameters(
        &self,
        project_name: &str,
        application_name: &str,
        process_name: &str,
    ) -> Result<Vec<FormalParameter>> {
        let names = self
            .fetch_names(
                &[
                    "projects",
                    project_name,
                    "applications",
                    application_name,
                    "processes",
                    process_name,
                    "formalParameters",
                ],
                "formalParameter",
                "formalParameterName",
            )
            .await?;

        Ok(names.into_iter().map(FormalParameter::new).collect())
    }
}

/// Collect names from `{"<list_key>": [{"<name_key>": "..."}, ...]}`
///
/// The server omits the list when it is empty and sends a bare object when
/// it holds a single entry; both are accepted. Entries without the name are
/// skipped.
fn extract_names(body: &JsonValue, list_key: &str, name_key: &str) -> Vec<String> {
    let entries = match body.get(list_key) {
        Some(JsonValue::Array(entries)) => entries.iter().collect::<Vec<_>>(),
        Some(entry @ JsonValue::Object(_)) => vec![entry],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| entry.get(name_key).and_then(JsonValue::as_str))
        .map(str::to_string)
        .collect()
}
