//! # HTTP Utilities
//!
//! Helpers for turning raw response bodies into something printable or
//! parseable.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a user-friendly hint for common HTTP error statuses.
///
/// ```rust
/// use n8n_ops_util::http::status_error_message;
///
/// assert!(status_error_message(401).unwrap().contains("N8N_API_KEY"));
/// assert!(status_error_message(404).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: set N8N_API_KEY=...".into()),
        403 => Some("Forbidden (403). Hint: check that the API key belongs to a user with access to this workflow".into()),
        _ => None,
    }
}

/// Parse response text as JSON, returning `None` when it is not JSON.
pub fn parse_response_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// The error includes the originating status and up to 200 characters of the
/// body with whitespace collapsed.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

/// First `limit` characters of `text`, cut on a character boundary.
///
/// ```rust
/// use n8n_ops_util::http::take_chars;
///
/// assert_eq!(take_chars("réponse", 3), "rép");
/// assert_eq!(take_chars("ok", 200), "ok");
/// ```
pub fn take_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    let mut kept = 0;
    for ch in text.chars() {
        if kept >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                    kept += 1;
                }
            }
            _ => {
                preview.push(ch);
                kept += 1;
            }
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
