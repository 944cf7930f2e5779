//! HTTP routes and handlers.

use std::io::Write;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ragserve_core::QueryResult;
use ragserve_extract::{ExtractError, UrlExtractor};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Maximum accepted request body, matching the original 50 MB upload cap.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/process-text", post(process_text))
        .route("/api/upload", post(upload))
        .route("/api/process-url", post(process_url))
        .route("/api/query", post(query))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct IngestResponse {
    success: bool,
    message: &'static str,
    namespace: String,
}

#[derive(Deserialize)]
struct ProcessTextRequest {
    text: Option<String>,
    namespace: Option<String>,
}

#[derive(Deserialize)]
struct ProcessUrlRequest {
    url: Option<String>,
    namespace: Option<String>,
}

#[derive(Deserialize)]
struct QueryRequest {
    question: Option<String>,
    namespace: Option<String>,
}

/// Reject absent or blank fields at the boundary.
fn require(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| ApiError::validation(message))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

async fn process_text(
    State(state): State<AppState>,
    Json(request): Json<ProcessTextRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let missing = "Text and namespace are required";
    let text = require(request.text, missing)?;
    let namespace = require(request.namespace, missing)?;

    let documents = state
        .text_extractor
        .extract(&text)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    state.pipeline.ingest(&namespace, &documents).await.map_err(|e| {
        error!(operation = "process-text", namespace = %namespace, error = %e, "ingestion failed");
        state.processing_error("Failed to process text", e)
    })?;

    Ok(Json(IngestResponse {
        success: true,
        message: "Text processed and stored successfully",
        namespace,
    }))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut namespace: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart request: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let media_type =
                    field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, media_type, bytes.to_vec()));
            }
            Some("namespace") => {
                namespace = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::validation(format!("Failed to read field: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, media_type, bytes) =
        file.ok_or_else(|| ApiError::validation("No file uploaded"))?;
    let namespace = require(namespace, "Namespace is required")?;

    info!(file = %file_name, media_type = %media_type, size = bytes.len(), "processing upload");

    // The upload is spooled to a scoped temp file that is removed when the
    // closure returns, whichever way extraction goes.
    let extractor = state.file_extractor;
    let documents = tokio::task::spawn_blocking(move || -> Result<_, ExtractError> {
        let mut spool = tempfile::NamedTempFile::new()?;
        spool.write_all(&bytes)?;
        extractor.extract(spool.path(), &media_type, &file_name)
    })
    .await
    .map_err(|e| state.processing_error("Failed to process file", e))?
    .map_err(|e| {
        error!(operation = "upload", namespace = %namespace, error = %e, "file extraction failed");
        state.processing_error("Failed to process file", e)
    })?;

    state.pipeline.ingest(&namespace, &documents).await.map_err(|e| {
        error!(operation = "upload", namespace = %namespace, error = %e, "ingestion failed");
        state.processing_error("Failed to process file", e)
    })?;

    Ok(Json(IngestResponse {
        success: true,
        message: "File processed and stored successfully",
        namespace,
    }))
}

async fn process_url(
    State(state): State<AppState>,
    Json(request): Json<ProcessUrlRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let missing = "URL and namespace are required";
    let url = require(request.url, missing)?;
    let namespace = require(request.namespace, missing)?;

    // Reject malformed URLs before any browser session is started.
    UrlExtractor::validate(&url).map_err(|_| ApiError::validation("Invalid URL format"))?;

    let documents = state.url_extractor.extract(&url).await.map_err(|e| {
        error!(operation = "process-url", namespace = %namespace, url = %url, error = %e, "URL extraction failed");
        state.processing_error("Failed to process URL", e)
    })?;

    state.pipeline.ingest(&namespace, &documents).await.map_err(|e| {
        error!(operation = "process-url", namespace = %namespace, error = %e, "ingestion failed");
        state.processing_error("Failed to process URL", e)
    })?;

    Ok(Json(IngestResponse {
        success: true,
        message: "URL content processed and stored successfully",
        namespace,
    }))
}

async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResult>, ApiError> {
    let missing = "Question and namespace are required";
    let question = require(request.question, missing)?;
    let namespace = require(request.namespace, missing)?;

    let result = state.pipeline.query(&namespace, &question).await.map_err(|e| {
        error!(operation = "query", namespace = %namespace, error = %e, "query failed");
        state.processing_error("Failed to process query", e)
    })?;

    Ok(Json(result))
}
