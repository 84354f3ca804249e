//! Route-level tests driving the router with a stub completion backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use persona_relay::completion::{ChatCompletion, ChatRequest, CompletionError};
use persona_relay::server::api::{build_router, AppState};

/// Replies with a fixed string, or fails, and records what it was asked.
struct StubCompletion {
    reply: Option<String>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl StubCompletion {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<ChatRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for StubCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.clone().ok_or(CompletionError::EmptyCompletion)
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn app(stub: Arc<StubCompletion>) -> Router {
    build_router(Arc::new(AppState::new(stub)))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_home_reports_online() {
    let (status, body) = send(app(StubCompletion::replying("x")), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["message"], "The Magic Fortune Teller API is ready.");
    assert!(body["usage"].as_str().unwrap().contains("/fortune"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let (status, body) = send(app(StubCompletion::replying("x")), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "stub-model");
}

#[tokio::test]
async fn test_fortune_success() {
    let stub = StubCompletion::replying("The stars foresee many tacos.");
    let (status, body) = send(
        app(stub.clone()),
        post_json("/fortune", r#"{"name": "Alice", "question": "Will I be rich?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "seeker": "Alice",
            "question": "Will I be rich?",
            "fortune": "The stars foresee many tacos."
        })
    );

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].system_prompt.contains("fortune teller"));
    assert_eq!(calls[0].user_prompt, "Name: Alice\nQuestion: Will I be rich?");
}

#[tokio::test]
async fn test_ask_success() {
    let stub = StubCompletion::replying("Sigh. Paris. Now let me rest.");
    let (status, body) = send(
        app(stub.clone()),
        post_json("/ask", r#"{"name": "Bob", "message": "Capital of France?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["seeker"], "Bob");
    assert_eq!(body["message"], "Capital of France?");
    assert_eq!(body["chatbot_reply"], "Sigh. Paris. Now let me rest.");
    assert!(stub.calls()[0].system_prompt.contains("nagging chatbot"));
}

#[tokio::test]
async fn test_missing_field_is_400() {
    let stub = StubCompletion::replying("unused");
    let (status, body) = send(
        app(stub.clone()),
        post_json("/fortune", r#"{"name": "Alice"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'name' or 'question' in request");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_non_string_field_is_400() {
    let (status, body) = send(
        app(StubCompletion::replying("unused")),
        post_json("/ask", r#"{"name": "Bob", "message": 12}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Both fields must be strings");
}

#[tokio::test]
async fn test_whitespace_field_is_400() {
    let (status, body) = send(
        app(StubCompletion::replying("unused")),
        post_json("/fortune", r#"{"name": "  ", "question": "hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fields cannot be empty strings");
}

#[tokio::test]
async fn test_overlong_message_is_400() {
    let body = json!({"name": "Bob", "message": "a".repeat(501)}).to_string();
    let (status, resp) = send(app(StubCompletion::replying("unused")), post_json("/ask", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Message cannot exceed 500 characters");
}

#[tokio::test]
async fn test_long_question_is_accepted_by_fortune() {
    let body = json!({"name": "Alice", "question": "a".repeat(501)}).to_string();
    let (status, _) = send(app(StubCompletion::replying("ok")), post_json("/fortune", &body)).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (status, body) = send(
        app(StubCompletion::replying("unused")),
        post_json("/fortune", "{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request must be valid JSON");
}

#[tokio::test]
async fn test_missing_content_type_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .body(Body::from(r#"{"name": "Bob", "message": "hi"}"#))
        .unwrap();
    let (status, body) = send(app(StubCompletion::replying("unused")), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request must be valid JSON");
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_text() {
    let (status, body) = send(
        app(StubCompletion::failing()),
        post_json("/fortune", r#"{"name": "Alice", "question": "hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "The crystal ball is cloudy (Internal Error): completion API returned no content"
    );

    let (status, body) = send(
        app(StubCompletion::failing()),
        post_json("/ask", r#"{"name": "Bob", "message": "hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Internal server error: completion API returned no content"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, body) = send(app(StubCompletion::replying("x")), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}
