//! Probe candidate webhook URLs and try a direct execution through the API.
//!
//! A URL counts as found as soon as either probe answers with something other
//! than 404. Nothing else about the response is checked.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use n8n_ops_api::{ApiResponse, N8nClient};
use n8n_ops_util::{production_webhook_url, redact_sensitive, take_chars, test_webhook_url};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::inspector::{DEFAULT_WEBHOOK_PATH, DEFAULT_WORKFLOW_ID};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const PREVIEW_CHARS: usize = 200;

/// Which webhook path and workflow to probe.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub workflow_id: String,
    pub webhook_path: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            workflow_id: DEFAULT_WORKFLOW_ID.into(),
            webhook_path: DEFAULT_WEBHOOK_PATH.into(),
        }
    }
}

/// Result of a single GET or POST probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Status(StatusCode),
    Failed(String),
}

impl ProbeOutcome {
    /// True for any answered status other than 404.
    pub fn is_live(&self) -> bool {
        matches!(self, ProbeOutcome::Status(status) if *status != StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status(status) => write!(f, "{}", status.as_u16()),
            ProbeOutcome::Failed(error) => write!(f, "error: {}", error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub url: String,
    pub get: ProbeOutcome,
    pub post: ProbeOutcome,
    /// Start of the body that made the URL count as found.
    pub preview: Option<String>,
}

impl ProbeReport {
    pub fn found(&self) -> bool {
        self.get.is_live() || self.post.is_live()
    }
}

/// The four URL shapes a webhook might be served under.
pub fn candidate_urls(base_url: &str, webhook_path: &str, workflow_id: &str) -> Vec<String> {
    vec![
        production_webhook_url(base_url, webhook_path),
        test_webhook_url(base_url, webhook_path),
        production_webhook_url(base_url, &format!("{}/{}", workflow_id, webhook_path)),
        production_webhook_url(base_url, &format!("{}/{}", webhook_path, workflow_id)),
    ]
}

async fn probe_once(client: &N8nClient, method: Method, url: &str) -> (ProbeOutcome, Option<ApiResponse>) {
    let mut builder = client.webhook(method.clone(), url).timeout(PROBE_TIMEOUT);
    if method == Method::POST {
        builder = builder.json(&json!({ "test": "data" }));
    }
    match client.send(builder).await {
        Ok(response) => (ProbeOutcome::Status(response.status), Some(response)),
        Err(error) => {
            let message = redact_sensitive(&format!("{error:#}"));
            warn!(%method, %url, error = %message, "probe failed");
            (ProbeOutcome::Failed(message), None)
        }
    }
}

/// GET then POST one URL, printing each status.
pub async fn probe_url(client: &N8nClient, url: &str) -> ProbeReport {
    println!("Test: {}", url);

    let (get, get_response) = probe_once(client, Method::GET, url).await;
    println!("  GET: {}", get);
    let (post, post_response) = probe_once(client, Method::POST, url).await;
    println!("  POST: {}", post);

    let live_response = [post_response, get_response]
        .into_iter()
        .flatten()
        .find(|response| response.status != StatusCode::NOT_FOUND);
    let preview = live_response.map(|response| take_chars(&response.body, PREVIEW_CHARS).to_string());

    let report = ProbeReport {
        url: url.to_string(),
        get,
        post,
        preview,
    };
    if report.found() {
        println!("  Webhook found!");
        if let Some(preview) = &report.preview {
            println!("  Response: {}...", preview);
        }
    }
    println!();
    report
}

/// Probe each URL in order. Failures on one URL never stop the others.
pub async fn probe_urls(client: &N8nClient, urls: &[String]) -> Vec<ProbeReport> {
    let mut reports = Vec::with_capacity(urls.len());
    for url in urls {
        reports.push(probe_url(client, url).await);
    }
    reports
}

pub fn found_urls(reports: &[ProbeReport]) -> Vec<&str> {
    reports
        .iter()
        .filter(|report| report.found())
        .map(|report| report.url.as_str())
        .collect()
}

/// Payload sent to the `/execute` endpoint.
pub fn execution_payload() -> Value {
    json!({
        "data": {
            "tool": "check",
            "name": "Test API Trigger",
            "email": "test@example.com",
            "startTime": "demain 16h",
        }
    })
}

/// Ask the API to execute a workflow directly, printing the result.
pub async fn trigger_execution(client: &N8nClient, workflow_id: &str) -> Result<ApiResponse> {
    let response = client.execute_workflow(workflow_id, &execution_payload()).await?;
    println!("  Status: {}", response.status.as_u16());
    if response.is_ok() {
        println!("  Workflow executed!");
        println!("  Response: {}", response.body);
    } else {
        println!("  Error: {}", response.body);
    }
    Ok(response)
}

/// Probe all candidate URLs, then try a direct execution.
pub async fn run(client: &N8nClient, options: &ProbeOptions) -> Vec<ProbeReport> {
    println!("Testing webhook URL variants:\n");
    let urls = candidate_urls(&client.base_url, &options.webhook_path, &options.workflow_id);
    let reports = probe_urls(client, &urls).await;

    let found = found_urls(&reports);
    if found.is_empty() {
        println!("No reachable webhook URL found");
    } else {
        println!("Reachable webhook URLs:");
        for url in found {
            println!("  - {}", url);
        }
    }

    println!("\nChecking through the n8n API...");
    println!("\nTriggering workflow {} manually...", options.workflow_id);
    if let Err(error) = trigger_execution(client, &options.workflow_id).await {
        println!("  Exception: {error:#}");
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_cover_all_four_shapes() {
        let urls = candidate_urls("https://acme.app.n8n.cloud", "appointment-webhook", "PPiFahvC1cVOxlIk");
        assert_eq!(
            urls,
            vec![
                "https://acme.app.n8n.cloud/webhook/appointment-webhook",
                "https://acme.app.n8n.cloud/webhook-test/appointment-webhook",
                "https://acme.app.n8n.cloud/webhook/PPiFahvC1cVOxlIk/appointment-webhook",
                "https://acme.app.n8n.cloud/webhook/appointment-webhook/PPiFahvC1cVOxlIk",
            ]
        );
    }

    #[test]
    fn only_non_404_statuses_are_live() {
        assert!(ProbeOutcome::Status(StatusCode::OK).is_live());
        assert!(ProbeOutcome::Status(StatusCode::INTERNAL_SERVER_ERROR).is_live());
        assert!(!ProbeOutcome::Status(StatusCode::NOT_FOUND).is_live());
        assert!(!ProbeOutcome::Failed("timed out".into()).is_live());
    }

    #[test]
    fn report_is_found_when_either_method_answers() {
        let report = ProbeReport {
            url: "u".into(),
            get: ProbeOutcome::Status(StatusCode::NOT_FOUND),
            post: ProbeOutcome::Status(StatusCode::OK),
            preview: None,
        };
        assert!(report.found());
        assert_eq!(found_urls(&[report]), vec!["u"]);
    }
}
