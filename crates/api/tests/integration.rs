//! Integration tests for the API layer.
//!
//! These tests spin up a real HTTP server on a random port with mock LLM
//! and search providers injected, then drive it over the wire with reqwest.

use async_trait::async_trait;
use postforge_api::{create_router, AppState, Settings};
use postforge_common::{PostforgeError, Result};
use postforge_llm::{LlmClient, LlmRequest, LlmResponse};
use postforge_tools::Tool;
use std::sync::Arc;

/// Mock LLM that answers every completion with a canned blog fragment.
struct MockLlm {
    should_fail: bool,
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if self.should_fail {
            return Err(PostforgeError::Llm(
                "Gemini API error 503: model overloaded".to_string(),
            ));
        }
        let prompt_len = request.messages.iter().map(|m| m.content.len()).sum::<usize>();
        Ok(LlmResponse {
            content: format!("# Generated section\n\n(from a {prompt_len}-char prompt)"),
            model: "mock".to_string(),
            usage: None,
            finish_reason: Some("stop".to_string()),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

struct MockSearch;

#[async_trait]
impl Tool for MockSearch {
    fn name(&self) -> &str {
        "serper_search"
    }

    fn description(&self) -> &str {
        "mock search"
    }

    async fn run(&self, query: &str) -> Result<String> {
        Ok(format!("1. Result for {query} (https://example.com)"))
    }
}

fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        llm_model: "mock".to_string(),
        crew_verbose: false,
        google_api_key: "test-google-key".to_string(),
        serper_api_key: "test-serper-key".to_string(),
    }
}

/// Spin up a test server on a random port and return the base URL.
async fn start_test_server(llm_fails: bool) -> String {
    let state = Arc::new(AppState::with_clients(
        test_settings(),
        Arc::new(MockLlm {
            should_fail: llm_fails,
        }),
        Arc::new(MockSearch),
    ));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Helper to GET a URL and return (status, body_string).
async fn get(base: &str, path: &str) -> (u16, String) {
    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

/// Helper to POST JSON and return (status, body_string).
async fn post_json(base: &str, path: &str, json: &str) -> (u16, String) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .header("content-type", "application/json")
        .body(json.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let base = start_test_server(false).await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert!(body.contains("healthy"));
}

// ============================================================================
// Blog generation: success path
// ============================================================================

#[tokio::test]
async fn test_generate_blog_returns_final_text() {
    let base = start_test_server(false).await;
    let (status, body) = post_json(
        &base,
        "/generate-blog/",
        r#"{"topic": "Rust async runtimes"}"#,
    )
    .await;
    assert_eq!(status, 200);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["topic"].as_str().unwrap(), "Rust async runtimes");
    assert!(!json["blog"]["raw"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_blog_echoes_untrimmed_topic() {
    let base = start_test_server(false).await;
    let (status, body) = post_json(&base, "/generate-blog/", r#"{"topic": "  Rust  "}"#).await;
    assert_eq!(status, 200);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["topic"].as_str().unwrap(), "  Rust  ");
}

// ============================================================================
// Blog generation: validation errors
// ============================================================================

#[tokio::test]
async fn test_empty_topic_is_rejected() {
    let base = start_test_server(false).await;
    let (status, body) = post_json(&base, "/generate-blog/", r#"{"topic": ""}"#).await;
    assert_eq!(status, 400);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["detail"].as_str().unwrap(), "'topic' must be provided");
}

#[tokio::test]
async fn test_whitespace_topic_is_rejected() {
    let base = start_test_server(false).await;
    let (status, body) = post_json(&base, "/generate-blog/", r#"{"topic": "   "}"#).await;
    assert_eq!(status, 400);
    assert!(body.contains("'topic' must be provided"));
}

#[tokio::test]
async fn test_missing_topic_field_is_rejected() {
    let base = start_test_server(false).await;
    let (status, body) = post_json(&base, "/generate-blog/", "{}").await;
    assert_eq!(status, 400);
    assert!(body.contains("'topic' must be provided"));
}

// ============================================================================
// Blog generation: pipeline failures
// ============================================================================

#[tokio::test]
async fn test_pipeline_failure_maps_to_500_with_detail() {
    let base = start_test_server(true).await;
    let (status, body) = post_json(&base, "/generate-blog/", r#"{"topic": "Rust"}"#).await;
    assert_eq!(status, 500);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("model overloaded"));
}

#[tokio::test]
async fn test_server_stays_alive_after_pipeline_failure() {
    let base = start_test_server(true).await;

    let (status, _) = post_json(&base, "/generate-blog/", r#"{"topic": "Rust"}"#).await;
    assert_eq!(status, 500);

    // The process must keep serving.
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert!(body.contains("healthy"));

    let (status, _) = post_json(&base, "/generate-blog/", r#"{"topic": ""}"#).await;
    assert_eq!(status, 400);
}
