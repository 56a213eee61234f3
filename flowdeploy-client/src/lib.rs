//! Flowdeploy HTTP Client
//!
//! A small, type-safe client for the REST API of the release-orchestration
//! server. It can start an application process, read back process metadata,
//! and list the catalog entries (projects, applications, processes,
//! environments, formal parameters) an operator picks from.
//!
//! Callers depend on the [`ProcessApi`] and [`CatalogApi`] traits so the
//! deployment workflow can be exercised against test doubles.
//!
//! # Example
//!
//! ```no_run
//! use flowdeploy_client::{FlowClient, ProcessApi};
//! use flowdeploy_core::domain::parameter::ActualParameter;
//! use flowdeploy_core::domain::request::{DeploymentRequest, DeploymentTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FlowClient::new("https://flow.example.com")
//!         .with_credentials("admin", "changeme");
//!
//!     let target = DeploymentTarget::new("Proj1", "App1", "Deploy", "QA")?;
//!     let request =
//!         DeploymentRequest::new(target, vec![ActualParameter::new("version", "1.2.3")])?;
//!     let result = client.start_process(&request).await?;
//!
//!     println!("Started job: {}", result.job_id);
//!     Ok(())
//! }
//! ```

mod catalog;
pub mod error;
mod processes;

// Re-export commonly used types
pub use catalog::CatalogApi;
pub use error::{ClientError, Result};
pub use processes::ProcessApi;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Path of the REST API below the server URL
const API_PREFIX: &str = "rest/v1.0";

/// HTTP client for the release-orchestration server
///
/// One instance is created per pipeline run and dropped when the run ends,
/// which closes its pooled connections.
#[derive(Debug, Clone)]
pub struct FlowClient {
    /// Base URL of the server (e.g., "https://flow.example.com")
    base_url: String,
    /// Basic-auth user name and password
    credentials: Option<(String, String)>,
    /// HTTP client instance
    client: Client,
}

impl FlowClient {
    /// Create a new client without credentials
    ///
    /// # Arguments
    /// * `base_url` - The server URL (e.g., "https://flow.example.com")
    ///
    /// # Example
    /// ```
    /// use flowdeploy_client::FlowClient;
    ///
    /// let client = FlowClient::new("https://flow.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            client,
        }
    }

    /// Create a client whose requests time out after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Authenticate every request with HTTP basic auth
    pub fn with_credentials(
        mut self,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((user_name.into(), password.into()));
        self
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// Build an API URL from raw path segments
    ///
    /// Segments are percent-encoded, so names containing spaces or slashes
    /// address exactly one path element.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, API_PREFIX)).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid server URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Server URL '{}' cannot have a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user_name, password)) => request.basic_auth(user_name, Some(password)),
            None => request,
        }
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = FlowClient::new("https://flow.example.com");
        assert_eq!(client.base_url(), "https://flow.example.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = FlowClient::new("https://flow.example.com/");
        assert_eq!(client.base_url(), "https://flow.example.com");
    }

    #[test]
    fn test_client_with_timeout() {
        let client =
            FlowClient::with_timeout("https://flow.example.com", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://flow.example.com");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = FlowClient::new("https://flow.example.com");
        let url = client
            .endpoint(&["projects", "My Project", "applications", "a/b"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://flow.example.com/rest/v1.0/projects/My%20Project/applications/a%2Fb"
        );
    }

    #[test]
    fn test_endpoint_keeps_server_context_path() {
        let client = FlowClient::new("https://example.com/flow-server/");
        let url = client.endpoint(&["projects"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/flow-server/rest/v1.0/projects");
    }

    #[test]
    fn test_endpoint_rejects_invalid_server_url() {
        let client = FlowClient::new("not a url");
        let err = client.endpoint(&["projects"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
