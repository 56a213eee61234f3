//! Deployment report
//!
//! The display-only record attached to a pipeline run once a deployment has
//! been started and correlated. Built once, never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::parameter::ActualParameter;
use crate::domain::process::{ProcessInvocationResult, ProcessMetadata};
use crate::domain::request::DeploymentTarget;

/// Correlated summary of one started deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub application_name: String,
    pub process_name: String,
    pub process_id: String,
    pub job_id: String,
    pub application_url: String,
    pub deploy_run_url: String,
    pub parameters: Vec<ActualParameter>,
    pub created_at: DateTime<Utc>,
}

impl DeploymentReport {
    /// Assemble the report from the invocation result and process metadata
    ///
    /// # Arguments
    /// * `server_url` - Base URL of the server, without trailing slash
    /// * `target` - The deployed target
    /// * `invocation` - Response of the start-process call (provides `jobId`)
    /// * `metadata` - Process metadata (provides `processId`)
    /// * `parameters` - The resolved parameters that were sent
    pub fn new(
        server_url: &str,
        target: &DeploymentTarget,
        invocation: &ProcessInvocationResult,
        metadata: &ProcessMetadata,
        parameters: Vec<ActualParameter>,
    ) -> Self {
        let server_url = server_url.trim_end_matches('/');

        Self {
            application_name: target.application_name.clone(),
            process_name: target.application_process_name.clone(),
            process_id: metadata.process_id.clone(),
            job_id: invocation.job_id.clone(),
            application_url: format!("{}/flow/#applications/applications", server_url),
            deploy_run_url: format!(
                "{}/flow/#applications/{}/{}/runningProcess",
                server_url, metadata.process_id, invocation.job_id
            ),
            parameters,
            created_at: Utc::now(),
        }
    }

    /// One-line plain-text summary for the run log
    pub fn summary_line(&self) -> String {
        format!(
            "Deployed application {} (process {}, job {}): {}",
            self.application_name, self.process_id, self.job_id, self.deploy_run_url
        )
    }

    /// HTML summary shown on the pipeline run page
    pub fn summary_html(&self) -> String {
        let mut html = String::from("<h3>Deploy Application</h3>\n");
        html.push_str("<table cellspacing=\"2\" cellpadding=\"4\">\n");
        push_link_row(
            &mut html,
            "Application Name:",
            &self.application_url,
            &self.application_name,
        );
        push_link_row(
            &mut html,
            "Deploy run URL:",
            &self.deploy_run_url,
            &self.deploy_run_url,
        );

        if !self.parameters.is_empty() {
            html.push_str("  <tr>\n    <td>&nbsp;<b>Parameters</b></td>\n    <td></td>\n  </tr>\n");
            for parameter in &self.parameters {
                html.push_str(&format!(
                    "  <tr>\n    <td>&nbsp;&nbsp;&nbsp;&nbsp;{}:</td>\n    <td>{}</td>\n  </tr>\n",
                    escape_html(&parameter.name),
                    escape_html(&parameter.value)
                ));
            }
        }

        html.push_str("</table>\n");
        html
    }
}

fn push_link_row(html: &mut String, label: &str, href: &str, text: &str) {
    html.push_str(&format!(
        "  <tr>\n    <td>{}</td>\n    <td><a href=\"{}\">{}</a></td>\n  </tr>\n",
        label,
        escape_html(href),
        escape_html(text)
    ));
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(server_url: &str) -> DeploymentReport {
        let target = DeploymentTarget::new("Proj1", "App1", "Deploy", "QA").unwrap();
        DeploymentReport::new(
            server_url,
            &target,
            &ProcessInvocationResult::new("job-42"),
            &ProcessMetadata::new("proc-7"),
            vec![ActualParameter::new("version", "1.2.3")],
        )
    }

    #[test]
    fn test_report_correlates_identifiers() {
        let report = sample_report("https://flow.example.com");
        assert_eq!(report.application_name, "App1");
        assert_eq!(report.process_name, "Deploy");
        assert_eq!(report.process_id, "proc-7");
        assert_eq!(report.job_id, "job-42");
        assert_eq!(
            report.application_url,
            "https://flow.example.com/flow/#applications/applications"
        );
        assert_eq!(
            report.deploy_run_url,
            "https://flow.example.com/flow/#applications/proc-7/job-42/runningProcess"
        );
    }

    #[test]
    fn test_report_trims_trailing_slash() {
        let report = sample_report("https://flow.example.com/");
        assert!(
            report
                .deploy_run_url
                .starts_with("https://flow.example.com/flow/#")
        );
    }

    #[test]
    fn test_summary_html_lists_parameters() {
        let html = sample_report("https://flow.example.com").summary_html();
        assert!(html.contains("<h3>Deploy Application</h3>"));
        assert!(html.contains(">App1</a>"));
        assert!(html.contains("version:"));
        assert!(html.contains("<td>1.2.3</td>"));
        assert!(html.ends_with("</table>\n"));
    }

    #[test]
    fn test_summary_html_escapes_values() {
        let mut report = sample_report("https://flow.example.com");
        report.parameters = vec![ActualParameter::new("note", "<b>\"x\" & y</b>")];
        let html = report.summary_html();
        assert!(html.contains("&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;"));
        assert!(!html.contains("<b>\"x\""));
    }

    #[test]
    fn test_summary_html_without_parameters() {
        let mut report = sample_report("https://flow.example.com");
        report.parameters.clear();
        assert!(!report.summary_html().contains("Parameters"));
    }
}
