//! Deploy-parameters document
//!
//! The operator edits a JSON document of the form
//!
//! ```json
//! {"runProcess": {"applicationName": "App1", "applicationProcessName": "Deploy",
//!                 "parameter": [{"actualParameterName": "version", "value": "1.2.3"}]}}
//! ```
//!
//! `applicationName` and `applicationProcessName` record which process the
//! document was generated for; only `parameter` is sent to the server.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::parameter::{ActualParameter, ensure_unique_names};
use crate::error::{DeployError, Result};

/// Document text used when no process is selected yet
pub const EMPTY_DOCUMENT: &str = "{}";

/// Top-level deploy-parameters document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployParametersDocument {
    pub run_process: RunProcess,
}

/// The `runProcess` section of a deploy-parameters document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProcess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_process_name: Option<String>,
    #[serde(deserialize_with = "deserialize_parameter_list")]
    pub parameter: Vec<ActualParameter>,
}

impl DeployParametersDocument {
    /// Create a document for the given process with the given parameters
    pub fn new(
        application_name: impl Into<String>,
        application_process_name: impl Into<String>,
        parameter: Vec<ActualParameter>,
    ) -> Self {
        Self {
            run_process: RunProcess {
                application_name: Some(application_name.into()),
                application_process_name: Some(application_process_name.into()),
                parameter,
            },
        }
    }

    /// Parse and validate a serialized document
    ///
    /// # Errors
    /// Returns [`DeployError::MalformedParameterDocument`] if the text is not
    /// JSON, lacks `runProcess.parameter`, has entries of the wrong shape, or
    /// repeats a parameter name.
    pub fn parse(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)
            .map_err(|e| DeployError::MalformedParameterDocument(e.to_string()))?;

        ensure_unique_names(&document.run_process.parameter)?;

        Ok(document)
    }

    /// Consume the document, keeping only the ordered parameter list
    pub fn into_parameters(self) -> Vec<ActualParameter> {
        self.run_process.parameter
    }

    /// Compact JSON text of the document
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| EMPTY_DOCUMENT.to_string())
    }
}

/// Accepts either an array of entries or a string holding that array as JSON
fn deserialize_parameter_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<ActualParameter>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ParameterList {
        Entries(Vec<ActualParameter>),
        Encoded(String),
    }

    match ParameterList::deserialize(deserializer)? {
        ParameterList::Entries(entries) => Ok(entries),
        ParameterList::Encoded(text) => serde_json::from_str(&text).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_parameter_order() {
        let document = DeployParametersDocument::parse(
            r#"{"runProcess":{"applicationName":"App1","applicationProcessName":"Deploy",
                "parameter":[{"actualParameterName":"b","value":"2"},
                             {"actualParameterName":"a","value":"1"}]}}"#,
        )
        .unwrap();

        assert_eq!(document.run_process.application_name.as_deref(), Some("App1"));
        assert_eq!(
            document.run_process.application_process_name.as_deref(),
            Some("Deploy")
        );
        let names: Vec<_> = document
            .into_parameters()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_accepts_string_encoded_parameter_list() {
        let document = DeployParametersDocument::parse(
            r#"{"runProcess":{"parameter":"[{\"actualParameterName\":\"version\",\"value\":\"1.2.3\"}]"}}"#,
        )
        .unwrap();
        assert_eq!(
            document.into_parameters(),
            vec![ActualParameter::new("version", "1.2.3")]
        );
    }

    #[test]
    fn test_missing_value_defaults_to_empty() {
        let document = DeployParametersDocument::parse(
            r#"{"runProcess":{"parameter":[{"actualParameterName":"version"}]}}"#,
        )
        .unwrap();
        assert_eq!(document.into_parameters()[0].value, "");
    }

    #[test]
    fn test_null_value_is_empty() {
        let document = DeployParametersDocument::parse(
            r#"{"runProcess":{"parameter":[{"actualParameterName":"version","value":null},
                                           {"actualParameterName":"replicas","value":3}]}}"#,
        )
        .unwrap();
        assert_eq!(
            document.into_parameters(),
            vec![
                ActualParameter::new("version", ""),
                ActualParameter::new("replicas", "3")
            ]
        );
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        let cases = [
            "",
            "not json",
            "{}",
            r#"{"runProcess":{}}"#,
            r#"{"runProcess":[]}"#,
            r#"{"runProcess":{"parameter":{"actualParameterName":"x"}}}"#,
            r#"{"runProcess":{"parameter":[{"value":"x"}]}}"#,
            r#"{"runProcess":{"parameter":"not an array"}}"#,
        ];

        for case in cases {
            let err = DeployParametersDocument::parse(case).unwrap_err();
            assert!(
                matches!(err, DeployError::MalformedParameterDocument(_)),
                "expected malformed document for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let err = DeployParametersDocument::parse(
            r#"{"runProcess":{"parameter":[{"actualParameterName":"v","value":"1"},
                                           {"actualParameterName":"v","value":"2"}]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate parameter 'v'"));
    }

    #[test]
    fn test_to_json_uses_wire_names() {
        let document = DeployParametersDocument::new(
            "App1",
            "Deploy",
            vec![ActualParameter::new("version", "")],
        );
        assert_eq!(
            document.to_json(),
            r#"{"runProcess":{"applicationName":"App1","applicationProcessName":"Deploy","parameter":[{"actualParameterName":"version","value":""}]}}"#
        );
    }
}
