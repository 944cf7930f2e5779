//! Route-level tests against the in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ragserve_core::{
    ChatModel, EmbeddingProvider, FixedSizeChunker, InMemoryNamespaceStore, RagConfig,
    RagPipeline, Result as RagResult,
};
use ragserve_extract::{FileExtractor, TextExtractor, UrlExtractor};
use ragserve_server::{app_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Deterministic hash-based embeddings; identical text embeds identically.
struct MockEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; 32];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        32
    }
}

/// Echoes the prompt so assertions can see the retrieved context.
struct EchoChatModel;

#[async_trait]
impl ChatModel for EchoChatModel {
    async fn complete(&self, prompt: &str) -> RagResult<String> {
        Ok(format!("Answer based on: {prompt}"))
    }
}

fn test_app() -> Router {
    let pipeline = Arc::new(
        RagPipeline::builder()
            .config(RagConfig::default())
            .embedding_provider(Arc::new(MockEmbeddingProvider))
            .chat_model(Arc::new(EchoChatModel))
            .store(Arc::new(InMemoryNamespaceStore::new()))
            .chunker(Arc::new(FixedSizeChunker::new(1000, 200).unwrap()))
            .build()
            .unwrap(),
    );

    app_router(AppState {
        pipeline,
        text_extractor: TextExtractor::new(),
        file_extractor: FileExtractor::new(),
        // Never reached by these tests; invalid URLs are rejected at the
        // boundary before a browser session is started.
        url_extractor: Arc::new(UrlExtractor::new("http://localhost:9515")),
        expose_error_details: true,
    })
}

async fn send_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn process_text_requires_both_fields() {
    let app = test_app();
    let (status, body) = send_json(&app, "/api/process-text", json!({ "text": "hello" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text and namespace are required");

    let (status, _) = send_json(&app, "/api/process-text", json!({ "namespace": "n" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send_json(&app, "/api/process-text", json!({ "text": "  ", "namespace": "n" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_text_then_query_answers_from_sources() {
    let app = test_app();

    let text = "The sky is blue. Grass is green.";
    let (status, body) =
        send_json(&app, "/api/process-text", json!({ "text": text, "namespace": "t1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["namespace"], "t1");

    let (status, body) = send_json(
        &app,
        "/api/query",
        json!({ "question": "What color is the sky?", "namespace": "t1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"].as_str().unwrap().contains("blue"));

    let sources = body["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert_eq!(sources[0]["content"], text);
    assert_eq!(sources[0]["metadata"]["source"], "text");
}

#[tokio::test]
async fn query_requires_both_fields() {
    let app = test_app();
    let (status, body) = send_json(&app, "/api/query", json!({ "question": "hm?" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Question and namespace are required");
}

#[tokio::test]
async fn query_against_unknown_namespace_is_a_processing_error() {
    let app = test_app();
    let (status, body) = send_json(
        &app,
        "/api/query",
        json!({ "question": "anything?", "namespace": "nowhere" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process query");
    assert!(body["details"].as_str().unwrap().contains("nowhere"));
}

#[tokio::test]
async fn process_url_rejects_malformed_url_without_a_browser() {
    let app = test_app();
    let (status, body) = send_json(
        &app,
        "/api/process-url",
        json!({ "url": "not a url", "namespace": "t1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid URL format");
}

#[tokio::test]
async fn process_url_requires_both_fields() {
    let app = test_app();
    let (status, body) =
        send_json(&app, "/api/process-url", json!({ "url": "https://example.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL and namespace are required");
}

fn multipart_request(uri: &str, parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
    let boundary = "ragserve-test-boundary";
    let mut body = String::new();
    for (name, file, content) in parts {
        body.push_str(&format!("--{boundary}\r\n"));
        match file {
            Some((filename, content_type)) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n"
                ));
            }
            None => {
                body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"));
            }
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_plain_text_file_ingests_and_answers() {
    let app = test_app();

    let request = multipart_request(
        "/api/upload",
        &[
            ("file", Some(("notes.txt", "text/plain")), "The sky is blue. Grass is green."),
            ("namespace", None, "files"),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "File processed and stored successfully");

    let (status, body) = send_json(
        &app,
        "/api/query",
        json!({ "question": "What color is grass?", "namespace": "files" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"].as_str().unwrap().contains("green"));
    assert_eq!(body["sources"][0]["metadata"]["source"], "notes.txt");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = test_app();
    let request = multipart_request("/api/upload", &[("namespace", None, "files")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn upload_without_namespace_is_rejected() {
    let app = test_app();
    let request = multipart_request(
        "/api/upload",
        &[("file", Some(("notes.txt", "text/plain")), "content")],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_unsupported_type_is_a_processing_error() {
    let app = test_app();
    let request = multipart_request(
        "/api/upload",
        &[
            ("file", Some(("report.doc", "application/msword")), "binary-ish"),
            ("namespace", None, "files"),
        ],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Failed to process file");
    assert!(body["details"].as_str().unwrap().contains("application/msword"));
}
