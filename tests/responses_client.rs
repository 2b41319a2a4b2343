//! The HTTP client against an in-process stub of the provider endpoint.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use construction_docgen::cancellation::CancellationToken;
use construction_docgen::config::OpenAiSettings;
use construction_docgen::domain::ai::ResponsesRequest;
use construction_docgen::domain::{
    Audience, DetailLevel, DocumentRequest, DocumentType, ModelContext, ProjectPhase,
};
use construction_docgen::error::{CompletionError, FailureKind};
use construction_docgen::services::{
    AiDocumentGenerator, CompletionTransport, DocumentGenerator, DocumentSchema, ResponsesClient,
    RetryPolicy,
};

#[derive(Debug, Clone)]
struct Captured {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    delay: Duration,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn respond(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    stub.captured.lock().push(Captured {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    (stub.status, stub.body.clone())
}

/// Serve `/v1/responses` on an ephemeral port and return its base URL.
async fn spawn_stub(
    status: StatusCode,
    body: String,
    delay: Duration,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/responses", post(respond))
        .with_state(Stub {
            status,
            body,
            delay,
            captured: captured.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

fn settings(base_url: &str) -> OpenAiSettings {
    OpenAiSettings {
        api_key: "sk-test".to_string(),
        base_url: base_url.to_string(),
        timeout_seconds: 10,
        ..OpenAiSettings::default()
    }
}

fn envelope(text: &str) -> String {
    json!({
        "id": "resp_123",
        "object": "response",
        "output": [
            {"type": "reasoning", "summary": []},
            {
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text}]
            }
        ]
    })
    .to_string()
}

fn document_payload() -> String {
    json!({
        "title": "Acme - Progress Report",
        "documentType": "Progress Report",
        "generatedDate": "2025-03-15",
        "sections": [{"heading": "Executive Summary", "content": "On track.", "order": 1}],
        "metadata": {
            "projectName": "Acme",
            "phase": "Construction",
            "audience": "Management",
            "detailLevel": "Short",
            "warnings": ["No rooms found in model."]
        }
    })
    .to_string()
}

fn request() -> DocumentRequest {
    DocumentRequest::new(
        DocumentType::ProgressReport,
        ProjectPhase::Construction,
        Audience::Management,
        DetailLevel::Short,
    )
}

fn wire_request() -> ResponsesRequest {
    ResponsesRequest::structured(
        "gpt-4.1",
        "system",
        "user".to_string(),
        json!({"type": "object"}),
        0.3,
        16000,
    )
}

#[tokio::test]
async fn sends_bearer_token_and_structured_body() {
    let (base_url, captured) =
        spawn_stub(StatusCode::OK, envelope("{}"), Duration::ZERO).await;
    let client = ResponsesClient::new(&settings(&base_url)).unwrap();

    let response = client
        .send(&wire_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.id, "resp_123");
    assert_eq!(response.output_text(), Some("{}"));

    let captured = captured.lock();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].authorization.as_deref(), Some("Bearer sk-test"));
    let body = &captured[0].body;
    assert_eq!(body["model"], "gpt-4.1");
    assert_eq!(body["instructions"], "system");
    assert_eq!(body["input"][0]["role"], "user");
    assert_eq!(body["max_output_tokens"], 16000);
    assert_eq!(body["store"], false);
    assert_eq!(body["text"]["format"]["type"], "json_schema");
    assert_eq!(body["text"]["format"]["strict"], true);
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let (base_url, _) = spawn_stub(
        StatusCode::UNAUTHORIZED,
        "{\"error\":{\"message\":\"Incorrect API key\"}}".to_string(),
        Duration::ZERO,
    )
    .await;
    let client = ResponsesClient::new(&settings(&base_url)).unwrap();

    let err = client
        .send(&wire_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        CompletionError::Http { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), FailureKind::Authentication);
}

#[tokio::test]
async fn undecodable_success_body_is_malformed() {
    let (base_url, _) =
        spawn_stub(StatusCode::OK, "not json".to_string(), Duration::ZERO).await;
    let client = ResponsesClient::new(&settings(&base_url)).unwrap();

    let err = client
        .send(&wire_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ResponsesClient::new(&settings(&format!("http://{addr}"))).unwrap();

    let err = client
        .send(&wire_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let (base_url, _) =
        spawn_stub(StatusCode::OK, envelope("{}"), Duration::from_secs(30)).await;
    let client = ResponsesClient::new(&settings(&base_url)).unwrap();
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        })
    };

    let started = std::time::Instant::now();
    let err = client.send(&wire_request(), &cancel).await.unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, CompletionError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn generator_round_trip_over_http() {
    let (base_url, captured) =
        spawn_stub(StatusCode::OK, envelope(&document_payload()), Duration::ZERO).await;
    let generator = AiDocumentGenerator::from_settings(
        &settings(&base_url),
        DocumentSchema::load().unwrap(),
        RetryPolicy::default(),
    )
    .unwrap();

    let mut context = ModelContext::default();
    context.project_info.name = "Acme".to_string();

    let doc = generator
        .generate(&context, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(doc.title, "Acme - Progress Report");
    assert_eq!(doc.warnings, vec!["No rooms found in model.".to_string()]);

    let captured = captured.lock();
    assert_eq!(captured.len(), 1);
    let prompt = captured[0].body["input"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("Document Type: Progress Report"));
    assert!(prompt.contains("\"name\": \"Acme\""));
}

#[tokio::test]
async fn null_envelope_id_still_yields_document() {
    let body = json!({
        "id": null,
        "output": [{
            "type": "message",
            "content": [{"type": "output_text", "text": document_payload()}]
        }]
    })
    .to_string();
    let (base_url, captured) = spawn_stub(StatusCode::OK, body, Duration::ZERO).await;
    let generator = AiDocumentGenerator::from_settings(
        &settings(&base_url),
        DocumentSchema::load().unwrap(),
        RetryPolicy::default(),
    )
    .unwrap();

    let doc = generator
        .generate(&ModelContext::default(), &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(doc.title, "Acme - Progress Report");
    assert_eq!(captured.lock().len(), 1);
}
