//! Gemini client against a local mock server: request shape and failure classification.

use millet_ai_services::{CallOutcome, GeminiClient, GenerateRequest, LanguageModel};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/test-model:generateContent";

async fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(server.uri(), "test-model", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn success_reply_is_decoded_and_key_sent_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "key-123"))
        .and(body_partial_json(json!({ "contents": [{ "parts": [{ "text": "Explain ragi" }] }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Ragi is finger millet." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let outcome = client
        .generate("key-123", &GenerateRequest::text("Explain ragi"))
        .await;

    match outcome {
        CallOutcome::Success(g) => {
            assert_eq!(g.text, "Ragi is finger millet.");
            assert!(g.sources.is_empty());
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn web_search_requests_carry_the_search_tool() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({ "tools": [{ "google_search": {} }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[]" }] },
                "groundingMetadata": { "groundingChunks": [{ "web": { "uri": "https://enam.gov.in" } }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let outcome = client
        .generate("k", &GenerateRequest::text("prices").with_web_search())
        .await;

    match outcome {
        CallOutcome::Success(g) => assert_eq!(g.sources, vec!["https://enam.gov.in"]),
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn status_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .await
        .generate("k", &GenerateRequest::text("hello"))
        .await;

    assert_eq!(outcome, CallOutcome::RateLimited);
}

#[tokio::test]
async fn server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .await
        .generate("k", &GenerateRequest::text("hello"))
        .await;

    match outcome {
        CallOutcome::Transient(e) => assert!(e.contains("503") && e.contains("overloaded")),
        other => panic!("expected transient, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_a_parse_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .await
        .generate("k", &GenerateRequest::text("hello"))
        .await;

    assert!(matches!(outcome, CallOutcome::ParseFault(_)));
}

#[tokio::test]
async fn slow_server_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri(), "test-model", Duration::from_millis(100)).unwrap();
    let outcome = client.generate("k", &GenerateRequest::text("hello")).await;

    assert!(matches!(outcome, CallOutcome::Transient(_)));
}

#[tokio::test]
async fn unreachable_host_is_transient() {
    let client = GeminiClient::new("http://127.0.0.1:9", "test-model", Duration::from_secs(2)).unwrap();

    let outcome = client.generate("k", &GenerateRequest::text("hello")).await;

    assert!(matches!(outcome, CallOutcome::Transient(_)));
}
