//! Import a workflow definition from disk, activate it and report its webhook.
//!
//! The create endpoint rejects unknown top-level properties, so documents are
//! projected onto the allowed fields before being sent. When the API still
//! complains about additional properties the import is retried once with a
//! minimal document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use n8n_ops_api::{ApiResponse, N8nClient};
use n8n_ops_types::{ALLOWED_CREATE_FIELDS, DEFAULT_WORKFLOW_NAME, Workflow, default_settings, id_text};
use n8n_ops_util::{
    parse_response_json_strict, production_webhook_url, redact_sensitive, status_error_message, with_timestamp_suffix,
    workflow_editor_url,
};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::warn;

/// Workflow file read when `--file` is not given.
pub const DEFAULT_WORKFLOW_FILE: &str = "workflows/appointment-booking-system.json";

/// Substring of the API's rejection message that triggers the minimal retry.
const ADDITIONAL_PROPERTIES_SIGNATURE: &str = "additional properties";

/// Failure to load the workflow file. Each variant ends the importer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON parse error in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// Read and parse a workflow definition.
pub fn load_workflow_file(path: &Path) -> Result<Map<String, Value>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(workflow)) => Ok(workflow),
        Ok(_) => Err(LoadError::NotAnObject { path: path.to_path_buf() }),
        Err(source) => Err(LoadError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Project `workflow` onto the fields the create endpoint accepts.
///
/// `settings` is always present and the name gets a timestamp suffix so
/// repeated imports do not collide.
pub fn clean_workflow_for_import(workflow: &Map<String, Value>) -> Map<String, Value> {
    clean_workflow_at(workflow, &Local::now())
}

/// [`clean_workflow_for_import`] with an explicit clock.
pub fn clean_workflow_at<Tz>(workflow: &Map<String, Value>, now: &DateTime<Tz>) -> Map<String, Value>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut cleaned: Map<String, Value> = ALLOWED_CREATE_FIELDS
        .iter()
        .filter_map(|field| workflow.get(*field).map(|value| (field.to_string(), value.clone())))
        .collect();

    cleaned.entry("settings").or_insert_with(default_settings);

    if let Some(name) = cleaned.get_mut("name") {
        let base = match &*name {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        *name = Value::String(with_timestamp_suffix(&base, now));
    }

    cleaned
}

/// Strictest document the create endpoint can accept.
fn minimal_workflow(workflow: &Map<String, Value>) -> Value {
    json!({
        "name": workflow.get("name").cloned().unwrap_or_else(|| Value::from(DEFAULT_WORKFLOW_NAME)),
        "nodes": workflow.get("nodes").cloned().unwrap_or_else(|| json!([])),
        "connections": workflow.get("connections").cloned().unwrap_or_else(|| json!({})),
        "settings": default_settings(),
    })
}

/// Create the workflow, retrying once with a minimal document when the API
/// rejects additional properties.
///
/// Returns the parsed creation response, or `None` when the workflow could
/// not be created.
pub async fn import_workflow(client: &N8nClient, workflow: &Map<String, Value>) -> Option<Value> {
    println!("Sending workflow to: {}", client.api_url("/workflows"));
    println!(
        "Workflow name: {}",
        workflow.get("name").and_then(Value::as_str).unwrap_or("Unnamed")
    );

    let response = match client.create_workflow(&Value::Object(workflow.clone())).await {
        Ok(response) => response,
        Err(error) => {
            println!("Import error: {error:#}");
            return None;
        }
    };

    println!("Status code: {}", response.status.as_u16());
    if response.is_ok_or_created() {
        return created_workflow(&response, "Workflow created");
    }

    println!("Error: {}", response.status.as_u16());
    println!("Response: {}", response.body);
    if let Some(hint) = status_error_message(response.status.as_u16()) {
        println!("{}", hint);
    }
    if !response.body.contains(ADDITIONAL_PROPERTIES_SIGNATURE) {
        return None;
    }

    println!("\nThe workflow contains properties the API does not allow.");
    println!("Retrying with a minimal workflow...");
    match client.create_workflow(&minimal_workflow(workflow)).await {
        Ok(retry) if retry.is_ok_or_created() => created_workflow(&retry, "Workflow created after stricter cleanup"),
        Ok(retry) => {
            println!("Import still failing after cleanup: {}", retry.body);
            None
        }
        Err(error) => {
            println!("Import error: {error:#}");
            None
        }
    }
}

fn created_workflow(response: &ApiResponse, message: &str) -> Option<Value> {
    match parse_response_json_strict(&response.body, Some(response.status)) {
        Ok(created) => {
            println!("{}", message);
            println!(
                "ID: {}",
                created.get("id").and_then(id_text).unwrap_or_else(|| "ID not found".into())
            );
            Some(created)
        }
        Err(error) => {
            warn!(body = %redact_sensitive(error.body_preview()), "create response is not JSON");
            println!("Import error: {error}");
            None
        }
    }
}

/// Activate a workflow, falling back to the `/activate` endpoint when the
/// `PATCH` is refused.
pub async fn activate_workflow(client: &N8nClient, workflow_id: &str) -> bool {
    println!("\nActivating workflow {}...", workflow_id);

    match client.set_active(workflow_id, true).await {
        Ok(response) if response.is_ok() => {
            println!("Workflow activated");
            return true;
        }
        Ok(response) => println!("Method 1 (PATCH) failed: {}", response.status.as_u16()),
        Err(error) => {
            println!("Activation error: {error:#}");
            return false;
        }
    }

    match client.activate(workflow_id).await {
        Ok(response) if response.is_ok() => {
            println!("Workflow activated (method 2)");
            true
        }
        Ok(response) => {
            println!("Could not activate the workflow: {}", response.body);
            false
        }
        Err(error) => {
            println!("Activation error: {error:#}");
            false
        }
    }
}

/// Path of the first webhook node in a creation response.
fn first_webhook_path(created: &Value) -> Option<String> {
    let workflow: Workflow = serde_json::from_value(created.clone()).ok()?;
    workflow.first_webhook_path().map(str::to_string)
}

/// Clean, import and activate `workflow`, printing a summary.
///
/// Returns true when the workflow was created.
pub async fn run(client: &N8nClient, workflow: &Map<String, Value>) -> bool {
    let cleaned = clean_workflow_for_import(workflow);
    println!("Workflow cleaned: {} fields kept", cleaned.len());

    let created = import_workflow(client, &cleaned).await;
    let Some((created, workflow_id)) = created.and_then(|value| {
        let id = value.get("id").and_then(id_text)?;
        Some((value, id))
    }) else {
        println!("\nWorkflow import FAILED");
        println!("Check that:");
        println!("   1. The API key is valid");
        println!("   2. The workflow file is correct");
        println!("   3. The n8n instance is reachable");
        return false;
    };

    let active = created.get("active").and_then(Value::as_bool).unwrap_or(false);
    println!("\nCreated workflow:");
    println!("   - ID: {}", workflow_id);
    println!("   - Name: {}", created.get("name").and_then(Value::as_str).unwrap_or("N/A"));
    println!("   - Active: {}", active);

    if !active {
        activate_workflow(client, &workflow_id).await;
    }

    if let Some(path) = first_webhook_path(&created).filter(|path| !path.is_empty()) {
        println!("\nWebhook URL: {}", production_webhook_url(&client.base_url, &path));
    }

    println!("\nSUCCESS! The workflow is ready to use.");
    println!("Open it at: {}", workflow_editor_url(&client.base_url, &workflow_id));
    true
}
