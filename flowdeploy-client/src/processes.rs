//! Process-related API endpoints
//!
//! Starting an application process and reading back its metadata. Neither
//! call is retried: a start request is sent at most once per invocation.

use async_trait::async_trait;
use flowdeploy_core::domain::parameter::ActualParameter;
use flowdeploy_core::domain::process::{ProcessInvocationResult, ProcessMetadata};
use flowdeploy_core::domain::request::DeploymentRequest;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::FlowClient;
use crate::error::{ClientError, Result};

/// Operations that start a process and correlate it afterwards
#[async_trait]
pub trait ProcessApi: Send + Sync {
    /// Base URL of the server, used to build links in reports
    fn server_url(&self) -> &str;

    /// Trigger exactly one run of the request's application process
    ///
    /// # Arguments
    /// * `request` - Target to deploy and its ordered actual parameters
    ///
    /// # Returns
    /// The server's acknowledgment, carrying the job id
    async fn start_process(&self, request: &DeploymentRequest) -> Result<ProcessInvocationResult>;

    /// Read the metadata of an application process
    ///
    /// Returns `Ok(None)` when the server does not know the process (yet).
    async fn get_process_metadata(
        &self,
        project_name: &str,
        application_name: &str,
        process_name: &str,
    ) -> Result<Option<ProcessMetadata>>;
}

/// Body of a runProcess request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunProcessRequest<'a> {
    project_name: &'a str,
    application_name: &'a str,
    process_name: &'a str,
    environment_name: &'a str,
    actual_parameter: &'a [ActualParameter],
}

#[async_trait]
impl ProcessApi for FlowClient {
    fn server_url(&self) -> &str {
        self.base_url()
    }

    async fn start_process(&self, request: &DeploymentRequest) -> Result<ProcessInvocationResult> {
        let target = request.target();
        let url = self.endpoint(&[
            "projects",
            target.project_name.as_str(),
            "applications",
            target.application_name.as_str(),
        ])?;

        let body = RunProcessRequest {
            project_name: &target.project_name,
            application_name: &target.application_name,
            process_name: &target.application_process_name,
            environment_name: &target.environment_name,
            actual_parameter: request.parameters(),
        };

        info!(
            "Starting process '{}' of application '{}' in environment '{}'",
            target.application_process_name, target.application_name, target.environment_name
        );

        let response = self
            .post(url)
            .query(&[
                ("request", "runProcess"),
                ("processName", target.application_process_name.as_str()),
                ("environmentName", target.environment_name.as_str()),
            ])
            .json(&body)
            .send()
            .await?;

        let result: ProcessInvocationResult = self.handle_response(response).await?;
        debug!("Process started with job id {}", result.job_id);

        Ok(result)
    }

    async fn get_process_metadata(
        &self,
        project_name: &str,
        application_name: &str,
        process_name: &str,
    ) -> Result<Option<ProcessMetadata>> {
        let url = self.endpoint(&[
            "projects",
            project_name,
            "applications",
            application_name,
            "processes",
            process_name,
        ])?;

        let response = self.get(url).send().await?;

        match self.handle_response::<JsonValue>(response).await {
            Ok(body) => decode_process_envelope(body),
            Err(e) if e.is_not_found() => {
                debug!(
                    "Process '{}' of application '{}' not found",
                    process_name, application_name
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Decode a `{"process": {...}}` response
///
/// A missing, null or empty `process` object means "not found".
fn decode_process_envelope(body: JsonValue) -> Result<Option<ProcessMetadata>> {
    let process = match body {
        JsonValue::Object(mut envelope) => envelope.remove("process"),
        _ => None,
    };

    match process {
        Some(JsonValue::Object(fields)) if !fields.is_empty() => {
            serde_json::from_value(JsonValue::Object(fields))
                .map(Some)
                .map_err(|e| ClientError::ParseError(format!("Invalid process metadata: {}", e)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeploy_core::domain::request::DeploymentTarget;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer exactly one HTTP request with `status` and `body`
    ///
    /// Returns the server URL and a handle yielding the raw request text.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            request
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8(raw).unwrap()
    }

    fn local_client(url: &str) -> FlowClient {
        let http_client = reqwest::Client::builder().no_proxy().build().unwrap();
        FlowClient::with_client(url, http_client)
    }

    fn request_body(request: &str) -> JsonValue {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_start_process_posts_run_process_request() {
        let (url, server) = serve_once("200 OK", r#"{"jobId":"job-42","status":"pending"}"#).await;
        let client = local_client(&url).with_credentials("admin", "secret");

        let target = DeploymentTarget::new("Proj 1", "App1", "Deploy", "QA").unwrap();
        let request =
            DeploymentRequest::new(target, vec![ActualParameter::new("version", "1.2.3")]).unwrap();

        let result = client.start_process(&request).await.unwrap();
        assert_eq!(result.job_id, "job-42");

        let raw = server.await.unwrap();
        assert!(raw.starts_with(
            "POST /rest/v1.0/projects/Proj%201/applications/App1?request=runProcess&processName=Deploy&environmentName=QA HTTP/1.1\r\n"
        ));
        assert!(
            raw.lines()
                .any(|line| line.eq_ignore_ascii_case("authorization: Basic YWRtaW46c2VjcmV0"))
        );
        assert_eq!(
            request_body(&raw),
            json!({
                "projectName": "Proj 1",
                "applicationName": "App1",
                "processName": "Deploy",
                "environmentName": "QA",
                "actualParameter": [{"actualParameterName": "version", "value": "1.2.3"}]
            })
        );
    }

    #[tokio::test]
    async fn test_start_process_server_error_is_api_error() {
        let (url, server) = serve_once("500 Internal Server Error", "boom").await;
        let client = local_client(&url);

        let target = DeploymentTarget::new("Proj1", "App1", "Deploy", "QA").unwrap();
        let request = DeploymentRequest::new(target, Vec::new()).unwrap();

        let err = client.start_process(&request).await.unwrap_err();
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected API error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_metadata_not_found_is_none() {
        let (url, server) = serve_once("404 Not Found", r#"{"error":"no such process"}"#).await;
        let client = local_client(&url);

        let metadata = client.get_process_metadata("P 1", "A", "D").await.unwrap();
        assert!(metadata.is_none());

        let raw = server.await.unwrap();
        assert!(raw.starts_with(
            "GET /rest/v1.0/projects/P%201/applications/A/processes/D HTTP/1.1\r\n"
        ));
    }

    #[tokio::test]
    async fn test_metadata_is_decoded() {
        let (url, server) = serve_once("200 OK", r#"{"process":{"processId":"proc-7"}}"#).await;
        let client = local_client(&url);

        let metadata = client
            .get_process_metadata("Proj1", "App1", "Deploy")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metadata.process_id, "proc-7");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_metadata_server_error_is_not_swallowed() {
        let (url, server) = serve_once("503 Service Unavailable", "down").await;
        let client = local_client(&url);

        let err = client
            .get_process_metadata("Proj1", "App1", "Deploy")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 503, .. }));
        server.await.unwrap();
    }

    #[test]
    fn test_decode_process_envelope() {
        let metadata = decode_process_envelope(json!({
            "process": {"processId": "proc-7", "processName": "Deploy"}
        }))
        .unwrap()
        .unwrap();
        assert_eq!(metadata.process_id, "proc-7");
    }

    #[test]
    fn test_decode_empty_envelope_is_not_found() {
        assert!(decode_process_envelope(json!({})).unwrap().is_none());
        assert!(decode_process_envelope(json!({"process": {}})).unwrap().is_none());
        assert!(decode_process_envelope(json!({"process": null})).unwrap().is_none());
        assert!(decode_process_envelope(JsonValue::Null).unwrap().is_none());
    }

    #[test]
    fn test_decode_process_without_id_is_parse_error() {
        let err =
            decode_process_envelope(json!({"process": {"processName": "Deploy"}})).unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[test]
    fn test_run_process_request_wire_format() {
        let parameters = vec![ActualParameter::new("version", "1.2.3")];
        let body = RunProcessRequest {
            project_name: "Proj1",
            application_name: "App1",
            process_name: "Deploy",
            environment_name: "QA",
            actual_parameter: &parameters,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "projectName": "Proj1",
                "applicationName": "App1",
                "processName": "Deploy",
                "environmentName": "QA",
                "actualParameter": [{"actualParameterName": "version", "value": "1.2.3"}]
            })
        );
    }

    #[test]
    fn test_server_url_is_base_url() {
        let client = FlowClient::new("https://flow.example.com/");
        assert_eq!(client.server_url(), "https://flow.example.com");
    }
}
