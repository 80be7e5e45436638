//! List workflows, locate their webhooks and cycle a workflow's activation.

use std::time::Duration;

use anyhow::{Context, Result};
use n8n_ops_api::{ApiResponse, N8nClient};
use n8n_ops_types::{Workflow, WorkflowList, WorkflowSummary};
use n8n_ops_util::{parse_response_json, production_webhook_url, status_error_message, test_webhook_url};
use reqwest::Method;
use serde_json::{Value, json};

use crate::print_banner;

pub const DEFAULT_NAME_PATTERN: &str = "appointment";
pub const DEFAULT_WORKFLOW_ID: &str = "PPiFahvC1cVOxlIk";
pub const DEFAULT_WEBHOOK_PATH: &str = "appointment-webhook";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// What the inspector looks for and which workflow it cycles.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Case-insensitive substring matched against workflow names.
    pub pattern: String,
    pub workflow_id: String,
    pub webhook_path: String,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_NAME_PATTERN.into(),
            workflow_id: DEFAULT_WORKFLOW_ID.into(),
            webhook_path: DEFAULT_WEBHOOK_PATH.into(),
        }
    }
}

/// A webhook node path with both of its URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoints {
    pub path: String,
    pub test_url: String,
    pub production_url: String,
}

impl WebhookEndpoints {
    fn new(base_url: &str, path: &str) -> Self {
        Self {
            path: path.to_string(),
            test_url: test_webhook_url(base_url, path),
            production_url: production_webhook_url(base_url, path),
        }
    }
}

fn print_failure(response: &ApiResponse) {
    println!("     Status: {}", response.status.as_u16());
    println!("     Body: {}", response.body);
    if let Some(hint) = status_error_message(response.status.as_u16()) {
        println!("     {}", hint);
    }
}

/// Active workflows in listing order. A refused listing prints the status and
/// yields nothing.
pub async fn list_active_workflows(client: &N8nClient) -> Result<Vec<WorkflowSummary>> {
    let response = client.list_workflows().await?;
    if !response.is_ok() {
        print_failure(&response);
        return Ok(Vec::new());
    }
    let list: WorkflowList = response.json_as().context("parse workflow list")?;
    Ok(list.active().cloned().collect())
}

pub fn matches_pattern(summary: &WorkflowSummary, pattern: &str) -> bool {
    summary.name.to_lowercase().contains(&pattern.to_lowercase())
}

/// Fetch a workflow's detail and derive the URLs of its webhook nodes.
pub async fn find_webhooks(client: &N8nClient, summary: &WorkflowSummary) -> Result<Vec<WebhookEndpoints>> {
    let response = client.get_workflow(&summary.id).await?;
    if !response.is_ok() {
        print_failure(&response);
        return Ok(Vec::new());
    }
    let workflow: Workflow = response
        .json_as()
        .with_context(|| format!("parse workflow {}", summary.id))?;
    Ok(workflow
        .webhook_nodes()
        .map(|node| WebhookEndpoints::new(&client.base_url, node.webhook_path()))
        .collect())
}

/// Deactivate then reactivate a workflow.
///
/// Both steps are attempted regardless of the first one's outcome. Returns
/// true when the reactivation answered 200.
pub async fn cycle_activation(client: &N8nClient, workflow_id: &str) -> bool {
    println!("   - Deactivating...");
    match client.set_active(workflow_id, false).await {
        Ok(response) => println!("     Status: {}", response.status.as_u16()),
        Err(error) => println!("     Error: {error:#}"),
    }

    println!("   - Reactivating...");
    match client.set_active(workflow_id, true).await {
        Ok(response) => {
            println!("     Status: {}", response.status.as_u16());
            response.is_ok()
        }
        Err(error) => {
            println!("     Error: {error:#}");
            false
        }
    }
}

/// Payload posted to the production webhook after reactivation.
pub fn reactivation_test_payload() -> Value {
    json!({
        "tool": "check",
        "name": "Test Réactivation",
        "email": "test@example.com",
        "startTime": "demain 14h",
    })
}

/// POST `payload` to a webhook URL and print what comes back.
pub async fn test_webhook(client: &N8nClient, url: &str, payload: &Value) -> Result<ApiResponse> {
    let builder = client.webhook(Method::POST, url).timeout(WEBHOOK_TIMEOUT).json(payload);
    let response = client.send(builder).await?;

    println!("   Status: {}", response.status.as_u16());
    if response.is_ok() {
        println!("   Webhook works!");
        let rendered = parse_response_json(&response.body)
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| response.body.clone());
        println!("   Response: {}", rendered);
    } else {
        println!("   Error: {}", response.body);
    }
    Ok(response)
}

/// Run the full inspection sequence.
pub async fn run(client: &N8nClient, options: &InspectOptions) {
    print_banner("N8N WORKFLOW DEBUG", 60);

    println!("\n1. Active workflows:");
    match list_active_workflows(client).await {
        Ok(active) => {
            for summary in &active {
                println!("   - {} (ID: {})", summary.name, summary.id);
                if !matches_pattern(summary, &options.pattern) {
                    continue;
                }
                match find_webhooks(client, summary).await {
                    Ok(endpoints) if !endpoints.is_empty() => {
                        println!("     Webhooks found:");
                        for endpoint in endpoints {
                            println!("        - Path: {}", endpoint.path);
                            println!("        - Test URL: {}", endpoint.test_url);
                            println!("        - Prod URL: {}", endpoint.production_url);
                        }
                    }
                    Ok(_) => {}
                    Err(error) => println!("     Error: {error:#}"),
                }
            }
        }
        Err(error) => println!("   Error: {error:#}"),
    }

    println!("\n2. Reactivating workflow {}:", options.workflow_id);
    if cycle_activation(client, &options.workflow_id).await {
        println!("   Workflow reactivated!");

        println!("\n3. Webhook test after reactivation:");
        let url = production_webhook_url(&client.base_url, &options.webhook_path);
        if let Err(error) = test_webhook(client, &url, &reactivation_test_payload()).await {
            println!("   Error: {error:#}");
        }
    }

    let test_url = test_webhook_url(&client.base_url, &options.webhook_path);
    println!("\n4. Test webhook (development mode):");
    println!("   URL: {}", test_url);
    println!("   Note: in test mode, click 'Execute Workflow' in the n8n editor first");

    println!("\n{}", "=".repeat(60));
    println!("POSSIBLE FIXES:");
    println!("1. Open n8n in your browser: {}", client.base_url);
    println!("2. Open the workflow that owns the '{}' webhook", options.webhook_path);
    println!("3. Click 'Execute Workflow' to enable the webhook in test mode");
    println!("4. OR call the test webhook: {}", test_url);
    println!("5. OR create a new workflow manually in the n8n editor");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> WorkflowSummary {
        WorkflowSummary {
            id: "id".into(),
            name: name.into(),
            active: true,
        }
    }

    #[test]
    fn pattern_match_ignores_case() {
        assert!(matches_pattern(&summary("Appointment Booking System - 20250805_010732"), "appointment"));
        assert!(matches_pattern(&summary("my APPOINTMENTS"), "Appointment"));
        assert!(!matches_pattern(&summary("Invoices"), "appointment"));
    }

    #[test]
    fn endpoints_cover_test_and_production() {
        let endpoints = WebhookEndpoints::new("https://acme.app.n8n.cloud", "appointment-webhook");
        assert_eq!(endpoints.test_url, "https://acme.app.n8n.cloud/webhook-test/appointment-webhook");
        assert_eq!(endpoints.production_url, "https://acme.app.n8n.cloud/webhook/appointment-webhook");
    }
}
