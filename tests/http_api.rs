//! Integration tests for the solving HTTP API.
//!
//! Drives the full router (layers included) with mock AI and OCR adapters.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use solve_relay::adapters::ai::{MockAIProvider, MockError};
use solve_relay::adapters::http::{app_router, FlowSettingsSet, SolveAppState};
use solve_relay::adapters::ocr::MockOcr;
use solve_relay::config::{FlowSettings, ServerConfig};

// =============================================================================
// Test Infrastructure
// =============================================================================

const IMAGE: &str = "data:image/png;base64,aGVsbG8=";

fn app(ai: MockAIProvider, ocr: MockOcr) -> Router {
    app_with_config(ai, ocr, ServerConfig::default())
}

fn app_with_config(ai: MockAIProvider, ocr: MockOcr, config: ServerConfig) -> Router {
    let flows = FlowSettingsSet {
        mcq: FlowSettings {
            model: Some("gpt-4o-mini".to_string()),
            ..FlowSettings::default()
        },
        ..FlowSettingsSet::default()
    };
    let state = SolveAppState::new(Arc::new(ai), Arc::new(ocr), flows);
    app_router(state, &config)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Flows
// =============================================================================

#[tokio::test]
async fn extract_returns_problem_from_screenshots() {
    let ai = MockAIProvider::new().with_response(
        r#"{"problem_statement": "Return the sum of a and b.", "test_cases": [{"input": "1 2", "output": "3"}]}"#,
    );
    let ocr = MockOcr::new().with_text("Return the sum of a and b.");

    let response = app(ai, ocr)
        .oneshot(post("/api/extract", json!({ "imageDataList": [IMAGE] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["problem_statement"], "Return the sum of a and b.");
    assert_eq!(body["test_cases"][0]["output"], "3");
}

#[tokio::test]
async fn request_id_is_propagated_to_provider() {
    let ai = MockAIProvider::new().with_response(r#"{"problem_statement": "Sum"}"#);

    let mut request = post("/api/extract", json!({ "text": "Sum two numbers" }));
    request
        .headers_mut()
        .insert("x-request-id", "client-req-42".parse().unwrap());

    let response = app(ai.clone(), MockOcr::new()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "client-req-42");
    assert_eq!(ai.get_calls()[0].metadata.trace_id, "client-req-42");
}

#[tokio::test]
async fn generate_accepts_fenced_model_output() {
    let ai = MockAIProvider::new().with_response(
        "```json\n{\"code\": \"def add(a, b):\\n    return a + b\", \"thoughts\": [\"Add them\"], \"time_complexity\": \"O(1)\", \"space_complexity\": \"O(1)\"}\n```",
    );

    let response = app(ai, MockOcr::new())
        .oneshot(post(
            "/api/generate",
            json!({
                "problemInfo": { "problem_statement": "Add two numbers", "test_cases": [] },
                "language": "python"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["code"], "def add(a, b):\n    return a + b");
    assert_eq!(body["thoughts"], json!(["Add them"]));
    assert_eq!(body["time_complexity"], "O(1)");
}

#[tokio::test]
async fn debug_requires_screenshots() {
    let ai = MockAIProvider::new();

    let response = app(ai.clone(), MockOcr::new())
        .oneshot(post(
            "/api/debug",
            json!({ "problemInfo": { "problem_statement": "Add two numbers" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(ai.call_count(), 0);
}

#[tokio::test]
async fn mcq_recovers_option_from_final_thought() {
    let ai = MockAIProvider::new().with_response(
        r#"{"thoughts": ["A and B are composite", "Final answer: C"], "explanation": "7 is prime"}"#,
    );

    let response = app(ai.clone(), MockOcr::new())
        .oneshot(post(
            "/api/mcq",
            json!({ "text": "Which is prime? A) 4 B) 6 C) 7 D) 8" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["correctOption"], "C");
    assert_eq!(body["explanation"], "7 is prime");
    assert_eq!(ai.get_calls()[0].model.as_deref(), Some("gpt-4o-mini"));
}

#[tokio::test]
async fn health_reports_provider() {
    let response = app(MockAIProvider::new(), MockOcr::new())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "status": "ok", "provider": "mock", "model": "mock-model-1" }));
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let response = app(MockAIProvider::new(), MockOcr::new())
        .oneshot(post("/api/generate", json!({ "language": "rust" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn invalid_base64_is_bad_request() {
    let response = app(MockAIProvider::new(), MockOcr::new())
        .oneshot(post("/api/extract", json!({ "imageDataList": ["%%%not-base64%%%"] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_errors_map_to_status_codes() {
    let cases = [
        (MockError::AuthenticationFailed, StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
        (
            MockError::RateLimited { retry_after_secs: 20 },
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
        ),
        (
            MockError::Timeout { timeout_secs: 120 },
            StatusCode::GATEWAY_TIMEOUT,
            "UPSTREAM_TIMEOUT",
        ),
        (
            MockError::Unavailable { message: "overloaded".into() },
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_ERROR",
        ),
    ];

    for (error, status, code) in cases {
        let ai = MockAIProvider::new().with_error(error);
        let response = app(ai, MockOcr::new())
            .oneshot(post("/api/mcq", json!({ "text": "Pick one: A) yes B) no" })))
            .await
            .unwrap();

        assert_eq!(response.status(), status);
        assert_eq!(body_json(response).await["code"], code);
    }
}

#[tokio::test]
async fn ocr_failure_is_unprocessable() {
    let ai = MockAIProvider::new();
    let ocr = MockOcr::new().with_failure("unreadable image");

    let response = app(ai.clone(), ocr)
        .oneshot(post("/api/extract", json!({ "imageDataList": [IMAGE] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "OCR_FAILED");
    assert_eq!(ai.call_count(), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ServerConfig {
        body_limit_bytes: 64,
        ..ServerConfig::default()
    };
    let text = "x".repeat(256);

    let response = app_with_config(MockAIProvider::new(), MockOcr::new(), config)
        .oneshot(post("/api/mcq", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
