//! Parameter domain types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use crate::error::{DeployError, Result};

/// A formal parameter paired with the value supplied for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualParameter {
    #[serde(rename = "actualParameterName")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_value")]
    pub value: String,
}

impl ActualParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named input declared by a process definition, without a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalParameter {
    #[serde(rename = "formalParameterName")]
    pub name: String,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fails on the first parameter name that occurs twice
pub fn ensure_unique_names(parameters: &[ActualParameter]) -> Result<()> {
    let mut seen = HashSet::new();
    for parameter in parameters {
        if !seen.insert(parameter.name.as_str()) {
            return Err(DeployError::MalformedParameterDocument(format!(
                "duplicate parameter '{}'",
                parameter.name
            )));
        }
    }

    Ok(())
}

/// Null becomes an empty value, numbers and booleans their JSON text
fn deserialize_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(String::new()),
        JsonValue::String(value) => Ok(value),
        scalar @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Ok(scalar.to_string()),
        other => Err(D::Error::custom(format!(
            "parameter value must be a scalar, got {}",
            other
        ))),
    }
}
