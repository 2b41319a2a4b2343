//! Router tests driven through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use construction_docgen::app::{create_app, AppState};
use construction_docgen::cancellation::CancellationToken;
use construction_docgen::config::Settings;
use construction_docgen::domain::{DocumentRequest, GeneratedDocument, ModelContext};
use construction_docgen::error::{CompletionError, GenerationError};
use construction_docgen::services::demo::demo_context;
use construction_docgen::services::{DemoDocumentGenerator, DocumentGenerator, GenerationPipeline};

/// Generator that always fails with a provider rate limit.
struct RateLimited;

#[async_trait]
impl DocumentGenerator for RateLimited {
    fn name(&self) -> &'static str {
        "rate-limited"
    }

    async fn generate(
        &self,
        _context: &ModelContext,
        _request: &DocumentRequest,
        _cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, GenerationError> {
        Err(GenerationError::Transport(CompletionError::Http {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "org-secret quota detail".to_string(),
        }))
    }
}

fn app_with(generator: Arc<dyn DocumentGenerator>) -> Router {
    let settings = Settings::from_lookup(|key| match key {
        "DOCGEN_DEMO" => Some("true".to_string()),
        _ => None,
    })
    .unwrap();

    create_app(AppState::new(settings, GenerationPipeline::new(generator)))
}

fn demo_app() -> Router {
    app_with(Arc::new(DemoDocumentGenerator::new()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn generate_body() -> Value {
    json!({
        "context": serde_json::to_value(demo_context()).unwrap(),
        "request": {
            "document_type": "technical_specification",
            "phase": "construction",
            "audience": "supervision",
            "detail_level": "extended",
            "include_quantities_summary": false
        }
    })
}

#[tokio::test]
async fn health_reports_generator() {
    let (status, headers, body) = send(demo_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key("x-request-id"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["generator"], "demo");
    assert_eq!(body["demo_mode"], true);
}

#[tokio::test]
async fn demo_contexts_are_served() {
    let (status, _, body) = send(demo_app(), get("/v1/demo/context")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["projectInfo"]["name"], "Centro Empresarial Procol");
    assert_eq!(body["data"]["levels"].as_array().unwrap().len(), 6);

    let (status, _, body) = send(demo_app(), get("/v1/demo/context/minimal")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(!body["data"]["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn generate_returns_document() {
    let (status, _, body) = send(
        demo_app(),
        post_json("/v1/documents", &generate_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let doc = &body["data"];
    assert_eq!(
        doc["title"],
        "Centro Empresarial Procol - Technical Specification [DEMO]"
    );
    assert_eq!(doc["documentType"], "Technical Specification");
    assert_eq!(doc["audience"], "Supervision / Inspector");
    assert_eq!(doc["detailLevel"], "Extended");
    let headings: Vec<&str> = doc["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["heading"].as_str().unwrap())
        .collect();
    assert!(!headings.contains(&"Quantities Summary"));
}

#[tokio::test]
async fn generation_failure_maps_status_without_provider_body() {
    let (status, _, body) = send(
        app_with(Arc::new(RateLimited)),
        post_json("/v1/documents", &generate_body()),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("org-secret"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["code"], "AI_RATE_LIMITED");
    assert_eq!(body["kind"], "rate_limited");
}

#[tokio::test]
async fn markdown_export_is_an_attachment() {
    let document = DemoDocumentGenerator::compose(
        &demo_context(),
        &serde_json::from_value(generate_body()["request"].clone()).unwrap(),
    );

    let (status, headers, body) = send(
        demo_app(),
        post_json(
            "/v1/documents/export/markdown",
            &serde_json::to_value(&document).unwrap(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment; filename="));
    assert_eq!(String::from_utf8(body).unwrap(), document.to_markdown());
}

#[tokio::test]
async fn binary_exports_are_not_implemented() {
    let document = json!({"title": "Acme", "sections": []});

    let (status, _, body) = send(
        demo_app(),
        post_json("/v1/documents/export/pdf", &document),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "NOT_IMPLEMENTED");

    let (status, _, _) = send(
        demo_app(),
        post_json("/v1/documents/export/odt", &document),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn error_body_echoes_caller_request_id() {
    let mut request = post_json("/v1/documents", &generate_body());
    request
        .headers_mut()
        .insert("x-request-id", "req-42".parse().unwrap());

    let (status, headers, body) = send(app_with(Arc::new(RateLimited)), request).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers["x-request-id"], "req-42");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["request_id"], "req-42");
    assert_eq!(body["code"], "AI_RATE_LIMITED");
}

#[tokio::test]
async fn error_body_carries_generated_request_id() {
    let (status, headers, body) = send(
        demo_app(),
        post_json("/v1/documents/export/docx", &json!({"title": "Acme"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    let generated = headers["x-request-id"].to_str().unwrap();
    assert!(!generated.is_empty());
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["request_id"], generated);
}
