//! Process domain types
//!
//! Responses read back from the release-orchestration server when a process
//! is started and when its metadata is fetched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Raw response of a start-process call
///
/// Only `jobId` is interpreted. Every other field is kept as-is so the run
/// log can show the server's full answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInvocationResult {
    pub job_id: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ProcessInvocationResult {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            extra: Map::new(),
        }
    }

    /// Pretty-printed JSON of the full response
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| format!("{{\"jobId\":\"{}\"}}", self.job_id))
    }
}

/// Metadata of a process instance on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetadata {
    pub process_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ProcessMetadata {
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            process_name: None,
            extra: Map::new(),
        }
    }
}
