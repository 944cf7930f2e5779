//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// An error surfaced to an HTTP client.
///
/// Validation failures are detected at the boundary and returned as 400
/// with their exact message. Everything else becomes a 500 carrying a
/// generic per-operation message. The underlying failure is attached as
/// `details` only when the server runs outside production, so a raw error
/// is never leaked to clients in production.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input; the message is shown to the client.
    Validation(String),
    /// A processing failure behind the boundary.
    Processing {
        /// Generic client-facing message.
        message: String,
        /// Underlying failure, exposed only in development.
        detail: String,
        /// Whether `detail` may be included in the response body.
        expose_detail: bool,
    },
}

impl ApiError {
    /// A 400 validation error with the given client-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// A 500 processing error wrapping an underlying failure.
    pub fn processing(
        message: impl Into<String>,
        source: impl std::fmt::Display,
        expose_detail: bool,
    ) -> Self {
        Self::Processing { message: message.into(), detail: source.to_string(), expose_detail }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody { error: message, details: None })
            }
            ApiError::Processing { message, detail, expose_detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { error: message, details: expose_detail.then_some(detail) },
            ),
        };
        (status, Json(body)).into_response()
    }
}
