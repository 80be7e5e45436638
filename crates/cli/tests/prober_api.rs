//! Prober behaviour against mocked webhook endpoints.

use n8n_ops::prober::{ProbeOutcome, candidate_urls, found_urls, probe_url, probe_urls, trigger_execution};
use n8n_ops_api::N8nClient;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn reports_only_the_url_that_answers() {
    let server = MockServer::start().await;
    Mock::given(path("/webhook-test/appointment-webhook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Workflow was started"))
        .mount(&server)
        .await;
    Mock::given(path("/webhook/appointment-webhook"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not registered"))
        .mount(&server)
        .await;

    let client = N8nClient::new(&server.uri(), "test-key").unwrap();
    let urls = candidate_urls(&server.uri(), "appointment-webhook", "PPiFahvC1cVOxlIk");
    let reports = probe_urls(&client, &urls).await;

    assert_eq!(reports.len(), 4);
    assert_eq!(
        found_urls(&reports),
        vec![format!("{}/webhook-test/appointment-webhook", server.uri()).as_str()]
    );
    let live = &reports[1];
    assert_eq!(live.get, ProbeOutcome::Status(StatusCode::OK));
    assert_eq!(live.post, ProbeOutcome::Status(StatusCode::OK));
    assert_eq!(live.preview.as_deref(), Some("Workflow was started"));
}

#[tokio::test]
async fn post_only_webhooks_count_as_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/appointment-webhook"))
        .and(body_json(json!({ "test": "data" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(500)))
        .mount(&server)
        .await;

    let client = N8nClient::new(&server.uri(), "test-key").unwrap();
    let report = probe_url(&client, &format!("{}/webhook/appointment-webhook", server.uri())).await;

    assert_eq!(report.get, ProbeOutcome::Status(StatusCode::NOT_FOUND));
    assert!(report.found());
    assert_eq!(report.preview.map(|preview| preview.len()), Some(200));
}

#[tokio::test]
async fn unreachable_urls_are_recorded_not_fatal() {
    let client = N8nClient::new("http://127.0.0.1:9", "test-key").unwrap();
    let report = probe_url(&client, "http://127.0.0.1:9/webhook/appointment-webhook").await;

    assert!(matches!(report.get, ProbeOutcome::Failed(_)));
    assert!(matches!(report.post, ProbeOutcome::Failed(_)));
    assert!(!report.found());
}

#[tokio::test]
async fn execution_posts_the_trigger_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/PPiFahvC1cVOxlIk/execute"))
        .and(body_json(json!({
            "data": {
                "tool": "check",
                "name": "Test API Trigger",
                "email": "test@example.com",
                "startTime": "demain 16h"
            }
        })))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = N8nClient::new(&server.uri(), "test-key").unwrap();
    let response = trigger_execution(&client, "PPiFahvC1cVOxlIk").await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
