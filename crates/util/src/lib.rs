//! Helpers shared by the n8n-ops command-line tools.

pub mod http;
pub mod timestamp;
pub mod webhook;

use once_cell::sync::Lazy;
use regex::Regex;

pub use http::*;
pub use timestamp::*;
pub use webhook::*;

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(x-n8n-api-key:\s*)([^\s]+)",
        r"(?i)(authorization:[ \t]*)([^\r\n]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
///
/// Covers the `X-N8N-API-KEY` header, authorization headers and
/// `*_KEY=`/`*_TOKEN=` style assignments.
///
/// ```rust
/// use n8n_ops_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("x-n8n-api-key: abc123"), "x-n8n-api-key: <redacted>");
/// assert_eq!(redact_sensitive("N8N_API_KEY=abc123 rest"), "N8N_API_KEY=<redacted> rest");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
