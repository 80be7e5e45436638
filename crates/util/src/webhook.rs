//! URL derivation for webhook endpoints and editor links.
//!
//! The platform exposes every webhook node twice: a production endpoint under
//! `/webhook/` that is live while the workflow is active, and a test endpoint
//! under `/webhook-test/` that only listens after a manual execution in the
//! editor.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Bytes escaped in webhook paths. `/` is kept because webhook paths may
/// contain nested segments.
const WEBHOOK_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn join(base_url: &str, prefix: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}/{}", base, prefix, utf8_percent_encode(path, WEBHOOK_PATH))
}

/// Production webhook URL: `{base}/webhook/{path}`.
///
/// ```rust
/// use n8n_ops_util::production_webhook_url;
///
/// assert_eq!(
///     production_webhook_url("https://acme.app.n8n.cloud/", "appointment-webhook"),
///     "https://acme.app.n8n.cloud/webhook/appointment-webhook"
/// );
/// ```
pub fn production_webhook_url(base_url: &str, path: &str) -> String {
    join(base_url, "webhook", path)
}

/// Test-mode webhook URL: `{base}/webhook-test/{path}`.
pub fn test_webhook_url(base_url: &str, path: &str) -> String {
    join(base_url, "webhook-test", path)
}

/// Link to the workflow in the web editor: `{base}/workflow/{id}`.
pub fn workflow_editor_url(base_url: &str, workflow_id: &str) -> String {
    join(base_url, "workflow", workflow_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_keep_their_slashes() {
        assert_eq!(
            production_webhook_url("http://localhost:5678", "PPiFahvC1cVOxlIk/appointment-webhook"),
            "http://localhost:5678/webhook/PPiFahvC1cVOxlIk/appointment-webhook"
        );
    }

    #[test]
    fn reserved_bytes_are_escaped() {
        assert_eq!(
            test_webhook_url("http://localhost:5678", "/my hook?x"),
            "http://localhost:5678/webhook-test/my%20hook%3Fx"
        );
    }

    #[test]
    fn editor_url_points_at_workflow() {
        assert_eq!(
            workflow_editor_url("https://acme.app.n8n.cloud", "abc"),
            "https://acme.app.n8n.cloud/workflow/abc"
        );
    }
}
