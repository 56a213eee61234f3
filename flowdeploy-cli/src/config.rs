//! Configuration module
//!
//! Handles CLI configuration: named server profiles and the inputs of one
//! deploy step.

use anyhow::{Context, Result};
use flowdeploy_client::FlowClient;
use flowdeploy_core::domain::request::DeploymentTarget;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON file holding server profiles
    pub profiles_path: PathBuf,
}

/// Connection settings for one release-orchestration server
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProfile {
    /// Name steps refer to in their `configuration` field
    pub name: String,
    /// Server base URL (e.g., "https://flow.example.com")
    pub url: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl std::fmt::Debug for ServerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerProfile")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ServerProfile {
    /// Validates the profile
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("profile name cannot be empty");
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!(
                "profile '{}': url must start with http:// or https://",
                self.name
            );
        }

        if self.timeout_seconds == 0 {
            anyhow::bail!("profile '{}': timeout_seconds must be > 0", self.name);
        }

        Ok(())
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Build an authenticated client for this server
    pub fn connect(&self) -> Result<FlowClient> {
        let client = FlowClient::with_timeout(&self.url, self.timeout())
            .with_context(|| format!("Failed to build HTTP client for profile '{}'", self.name))?;

        Ok(match &self.user_name {
            Some(user_name) => {
                client.with_credentials(user_name, self.password.clone().unwrap_or_default())
            }
            None => client,
        })
    }
}

/// All configured server profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: Vec<ServerProfile>,
}

impl ProfileStore {
    /// Load and validate profiles from a JSON array file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profiles file: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Invalid profiles file: {}", path.display()))
    }

    /// Parse and validate profiles from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let profiles: Vec<ServerProfile> =
            serde_json::from_str(content).context("Failed to parse profiles")?;

        for profile in &profiles {
            profile.validate()?;
        }

        Ok(Self { profiles })
    }

    /// Find a profile by name
    pub fn get(&self, name: &str) -> Result<&ServerProfile> {
        if name.trim().is_empty() {
            anyhow::bail!("No configuration selected");
        }

        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| anyhow::anyhow!("Configuration '{}' not found", name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerProfile> {
        self.profiles.iter()
    }
}

/// Inputs of one deploy step, as stored by the host pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepConfig {
    /// Name of the server profile
    pub configuration: String,
    pub project_name: String,
    pub application_name: String,
    pub application_process_name: String,
    pub environment_name: String,
    /// Serialized deploy-parameters document
    pub deploy_parameters: String,
}

impl StepConfig {
    /// Load a step record from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read step file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse step file: {}", path.display()))
    }

    /// The target as configured; not yet validated
    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget {
            project_name: self.project_name.clone(),
            application_name: self.application_name.clone(),
            application_process_name: self.application_process_name.clone(),
            environment_name: self.environment_name.clone(),
        }
    }
}
