//! Deployment request domain types

use serde::{Deserialize, Serialize};

use crate::domain::parameter::{ActualParameter, ensure_unique_names};
use crate::error::{DeployError, Result};

/// Identity of the application process to deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTarget {
    pub project_name: String,
    pub application_name: String,
    pub application_process_name: String,
    pub environment_name: String,
}

impl DeploymentTarget {
    /// Build a target, rejecting any empty identity field
    pub fn new(
        project_name: impl Into<String>,
        application_name: impl Into<String>,
        application_process_name: impl Into<String>,
        environment_name: impl Into<String>,
    ) -> Result<Self> {
        let target = Self {
            project_name: project_name.into(),
            application_name: application_name.into(),
            application_process_name: application_process_name.into(),
            environment_name: environment_name.into(),
        };
        target.validate()?;
        Ok(target)
    }

    /// Checks that all four identity fields are non-empty
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Project name", &self.project_name),
            ("Application name", &self.application_name),
            ("Application process name", &self.application_process_name),
            ("Environment name", &self.environment_name),
        ];

        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(DeployError::Configuration(format!(
                    "{} must not be empty",
                    label
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Project name: {}, Application name: {}, Application process name: {}, Environment name: {}",
            self.project_name,
            self.application_name,
            self.application_process_name,
            self.environment_name
        )
    }
}

/// One deployment attempt: a target plus its ordered actual parameters
///
/// Built fresh for each pipeline execution and dropped with it. Parameter
/// names are unique and keep the operator's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    target: DeploymentTarget,
    parameters: Vec<ActualParameter>,
}

impl DeploymentRequest {
    /// Build a request from a validated target and resolved parameters
    ///
    /// # Errors
    /// `Configuration` for an empty identity field, `MalformedParameterDocument`
    /// for a repeated parameter name.
    pub fn new(target: DeploymentTarget, parameters: Vec<ActualParameter>) -> Result<Self> {
        target.validate()?;
        ensure_unique_names(&parameters)?;
        Ok(Self { target, parameters })
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    pub fn parameters(&self) -> &[ActualParameter] {
        &self.parameters
    }

    /// Consume the request, keeping the parameters for the report
    pub fn into_parameters(self) -> Vec<ActualParameter> {
        self.parameters
    }
}
