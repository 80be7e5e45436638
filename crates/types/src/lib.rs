//! Shared data model for the n8n public API.
//!
//! These types describe the parts of a workflow document that the command-line
//! tools actually read: the list envelope, workflow summaries, and webhook
//! nodes. Documents that are sent back to the API (for example during import)
//! stay as raw `serde_json` maps so node content round-trips untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};
use serde_json::{Map, Value, json};

/// Node `type` used by the platform for webhook triggers.
pub const WEBHOOK_NODE_TYPE: &str = "n8n-nodes-base.webhook";

/// Top-level fields the create-workflow endpoint accepts.
pub const ALLOWED_CREATE_FIELDS: &[&str] = &["name", "nodes", "connections", "settings"];

/// Name used when a minimal retry payload has no name to carry over.
pub const DEFAULT_WORKFLOW_NAME: &str = "Appointment Booking System";

/// Execution settings applied when a definition has none.
pub fn default_settings() -> Value {
    json!({ "executionOrder": "v1" })
}

/// Render a JSON `id` that may be a string or a number.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn id_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_text(&value).ok_or_else(|| de::Error::custom(format!("workflow id must be a string or number, got {value}")))
}

fn optional_id_from_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => id_text(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("workflow id must be a string or number, got {value}"))),
    }
}

/// Entry returned by `GET /api/v1/workflows`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorkflowSummary {
    #[serde(deserialize_with = "id_from_value")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// The `{"data": [...]}` envelope wrapping list responses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WorkflowList {
    #[serde(default)]
    pub data: Vec<WorkflowSummary>,
}

impl WorkflowList {
    /// Summaries whose `active` flag is set, in listing order.
    pub fn active(&self) -> impl Iterator<Item = &WorkflowSummary> {
        self.data.iter().filter(|workflow| workflow.active)
    }
}

/// A single step in a workflow graph.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Node {
    /// Returns true when this node is a webhook trigger.
    pub fn is_webhook(&self) -> bool {
        self.node_type == WEBHOOK_NODE_TYPE
    }

    /// The configured webhook path, or an empty string when unset.
    pub fn webhook_path(&self) -> &str {
        self.parameters.get("path").and_then(Value::as_str).unwrap_or("")
    }
}

/// Full workflow detail as returned by `GET /api/v1/workflows/{id}` or by
/// the create endpoint.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Workflow {
    #[serde(default, deserialize_with = "optional_id_from_value")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Node graph edges keyed by source node name, in authoring order.
    #[serde(default)]
    pub connections: IndexMap<String, Value>,
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
}

impl Workflow {
    /// All webhook trigger nodes in node order.
    pub fn webhook_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_webhook())
    }

    /// Path of the first webhook node, if the workflow has one.
    pub fn first_webhook_path(&self) -> Option<&str> {
        self.webhook_nodes().next().map(Node::webhook_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_tolerates_missing_fields() {
        let list: WorkflowList = serde_json::from_value(json!({
            "data": [
                { "id": "a1", "name": "Appointment Booking", "active": true },
                { "id": "b2", "name": "Draft" }
            ]
        }))
        .unwrap();

        assert_eq!(list.data.len(), 2);
        assert!(!list.data[1].active);
        let active: Vec<_> = list.active().map(|w| w.id.as_str()).collect();
        assert_eq!(active, vec!["a1"]);
    }

    #[test]
    fn numeric_ids_are_read_as_text() {
        let list: WorkflowList = serde_json::from_value(json!({
            "data": [
                { "id": 7, "name": "Legacy", "active": true },
                { "id": "PPiFahvC1cVOxlIk", "name": "Booking", "active": true }
            ]
        }))
        .unwrap();
        let ids: Vec<_> = list.data.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "PPiFahvC1cVOxlIk"]);

        let workflow: Workflow = serde_json::from_value(json!({ "id": 12, "name": "Legacy" })).unwrap();
        assert_eq!(workflow.id.as_deref(), Some("12"));
        let unsaved: Workflow = serde_json::from_value(json!({ "id": null, "name": "Draft" })).unwrap();
        assert_eq!(unsaved.id, None);
    }

    #[test]
    fn object_ids_are_rejected() {
        let result: Result<WorkflowSummary, _> = serde_json::from_value(json!({ "id": { "nested": 1 } }));
        assert!(result.is_err());
        assert_eq!(id_text(&json!(true)), None);
    }

    #[test]
    fn webhook_nodes_are_detected_by_type() {
        let workflow: Workflow = serde_json::from_value(json!({
            "id": "wf",
            "name": "Booking",
            "nodes": [
                { "name": "Set", "type": "n8n-nodes-base.set", "parameters": {} },
                { "name": "Hook", "type": WEBHOOK_NODE_TYPE, "parameters": { "path": "appointment-webhook" } },
                { "name": "Hook 2", "type": WEBHOOK_NODE_TYPE }
            ],
            "connections": { "Hook": { "main": [] } }
        }))
        .unwrap();

        let paths: Vec<_> = workflow.webhook_nodes().map(Node::webhook_path).collect();
        assert_eq!(paths, vec!["appointment-webhook", ""]);
        assert_eq!(workflow.first_webhook_path(), Some("appointment-webhook"));
        assert!(workflow.settings.is_empty());
    }

    #[test]
    fn workflow_without_webhooks_has_no_path() {
        let workflow = Workflow {
            nodes: vec![Node {
                node_type: "n8n-nodes-base.cron".into(),
                ..Node::default()
            }],
            ..Workflow::default()
        };
        assert_eq!(workflow.first_webhook_path(), None);
    }
}
