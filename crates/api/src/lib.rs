//! n8n public API client utilities.
//!
//! This crate provides a lightweight client for the n8n REST API. It focuses on:
//!
//! - Constructing HTTP clients with the headers the API expects
//! - Discovering the API key from `N8N_API_KEY`
//! - Resolving and validating the instance base URL
//! - Thin endpoint helpers that return the raw status and body so callers can
//!   report failures verbatim
//!
//! The primary entry point is [`N8nClient`]. Create an instance via
//! [`N8nClient::new_from_env`] and call the endpoint helpers, or build ad-hoc
//! requests with [`N8nClient::request`] and [`N8nClient::webhook`].
//!
//! # Example
//!
//! ```ignore
//! use n8n_ops_api::N8nClient;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = N8nClient::new_from_env(None)?;
//!     let response = client.list_workflows().await?;
//!     println!("status: {}", response.status);
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "N8N_API_KEY";
/// Environment variable overriding the instance base URL.
pub const BASE_URL_ENV: &str = "N8N_BASE_URL";
/// Instance used when neither a flag nor `N8N_BASE_URL` names one.
pub const DEFAULT_BASE_URL: &str = "https://autoscaleai2001.app.n8n.cloud";
/// Placeholder sent when no API key is configured.
pub const PLACEHOLDER_API_KEY: &str = "[YOUR_N8N_API_KEY]";
/// Header carrying the API key on every API request (`X-N8N-API-KEY`).
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

const API_PREFIX: &str = "/api/v1";
const API_TIMEOUT: Duration = Duration::from_secs(30);
/// Hostnames where plain HTTP is expected and not worth a warning.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Configuration problems detected while constructing a client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL '{0}' must include a host")]
    MissingHost(String),
    #[error("N8N_API_KEY contains characters that cannot be sent in an HTTP header")]
    InvalidApiKey,
}

/// Status and raw body of a completed request.
///
/// Non-success statuses are not errors at this layer: the tools print them.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// 200 or 201, the statuses the create endpoint answers with.
    pub fn is_ok_or_created(&self) -> bool {
        matches!(self.status, StatusCode::OK | StatusCode::CREATED)
    }

    /// Exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Parse the body into a typed value.
    pub fn json_as<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around configured `reqwest::Client`s for n8n access.
///
/// `api` carries the API key and JSON content type on every request and is
/// bounded by a client-wide timeout. `webhooks` sends plain requests without
/// credentials; callers choose per-request timeouts.
pub struct N8nClient {
    pub base_url: String,
    api: Client,
    webhooks: Client,
    user_agent: String,
}

impl N8nClient {
    /// Construct a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut api_key_value = header::HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        api_key_value.set_sensitive(true);

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::HeaderName::from_static(API_KEY_HEADER), api_key_value);
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let api = Client::builder()
            .default_headers(default_headers)
            .timeout(API_TIMEOUT)
            .build()
            .context("build api http client")?;
        let webhooks = Client::builder().build().context("build webhook http client")?;

        Ok(Self {
            base_url,
            api,
            webhooks,
            user_agent: format!("n8n-ops/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client from the environment.
    ///
    /// Resolution order for the base URL: `base_url_override`, then
    /// `N8N_BASE_URL`, then [`DEFAULT_BASE_URL`]. The API key comes from
    /// `N8N_API_KEY` and falls back to [`PLACEHOLDER_API_KEY`].
    pub fn new_from_env(base_url_override: Option<&str>) -> Result<Self> {
        let base_url = resolve_base_url(base_url_override);
        let api_key = resolve_api_key();
        Self::new(&base_url, &api_key)
    }

    /// Absolute URL of an API-relative path such as `/workflows`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Build a request for an API-relative path such as `/workflows`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.api_url(path);
        debug!(%method, %url, "building api request");

        self.api
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Build an unauthenticated request for an absolute webhook URL.
    pub fn webhook(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, %url, "building webhook request");

        self.webhooks
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Send a request and collect its status and body.
    ///
    /// Only transport failures (connection, timeout, body read) are errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse> {
        let response = builder.send().await.map_err(|error| {
            warn!(%error, "request failed");
            error
        })?;
        let status = response.status();
        let body = response.text().await.context("read response body")?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "non-success response");
        }
        Ok(ApiResponse { status, body })
    }

    /// `GET /workflows`
    pub async fn list_workflows(&self) -> Result<ApiResponse> {
        self.send(self.request(Method::GET, "/workflows")).await
    }

    /// `GET /workflows/{id}`
    pub async fn get_workflow(&self, workflow_id: &str) -> Result<ApiResponse> {
        self.send(self.request(Method::GET, &workflow_path(workflow_id))).await
    }

    /// `PATCH /workflows/{id}` with `{"active": active}`.
    pub async fn set_active(&self, workflow_id: &str, active: bool) -> Result<ApiResponse> {
        let builder = self
            .request(Method::PATCH, &workflow_path(workflow_id))
            .json(&serde_json::json!({ "active": active }));
        self.send(builder).await
    }

    /// `POST /workflows` with a workflow document.
    pub async fn create_workflow(&self, workflow: &Value) -> Result<ApiResponse> {
        self.send(self.request(Method::POST, "/workflows").json(workflow)).await
    }

    /// `POST /workflows/{id}/activate`
    pub async fn activate(&self, workflow_id: &str) -> Result<ApiResponse> {
        let path = format!("{}/activate", workflow_path(workflow_id));
        self.send(self.request(Method::POST, &path)).await
    }

    /// `POST /workflows/{id}/execute` with a payload.
    pub async fn execute_workflow(&self, workflow_id: &str, payload: &Value) -> Result<ApiResponse> {
        let path = format!("{}/execute", workflow_path(workflow_id));
        self.send(self.request(Method::POST, &path).json(payload)).await
    }
}

fn workflow_path(workflow_id: &str) -> String {
    format!("/workflows/{}", workflow_id)
}

/// Pick the base URL from an explicit override, `N8N_BASE_URL`, or the default.
pub fn resolve_base_url(base_url_override: Option<&str>) -> String {
    base_url_override
        .map(str::to_string)
        .or_else(|| env::var(BASE_URL_ENV).ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

/// Read `N8N_API_KEY`, falling back to the placeholder.
pub fn resolve_api_key() -> String {
    env::var(API_KEY_ENV).unwrap_or_else(|_| {
        warn!("{} is not set; requests will carry a placeholder key", API_KEY_ENV);
        PLACEHOLDER_API_KEY.to_string()
    })
}

/// Validate that a base URL is acceptable for use by the client.
///
/// The URL must parse and carry a host. Plain HTTP is accepted anywhere, but
/// outside `localhost` / `127.0.0.1` it is logged as a warning since the API
/// key travels in a header.
///
/// Self-hosted instances live on arbitrary domains, so hosts are not
/// restricted further.
fn validate_base_url(base: &str) -> Result<(), ConfigError> {
    let parsed_base_url = Url::parse(base).map_err(|source| ConfigError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ConfigError::MissingHost(base.to_string()))?;

    let is_local = LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
    if !is_local && parsed_base_url.scheme() != "https" {
        warn!(%host_name, scheme = parsed_base_url.scheme(), "base URL is not https; the API key is sent in clear text");
    }

    Ok(())
}
