//! Shared application state.

use std::sync::Arc;

use ragserve_core::RagPipeline;
use ragserve_extract::{FileExtractor, TextExtractor, UrlExtractor};

use crate::error::ApiError;

/// Process-wide handles shared by all request handlers.
///
/// Everything here is constructed once at startup and used read-only;
/// request handlers never mutate shared state.
#[derive(Clone)]
pub struct AppState {
    /// The ingest-and-answer pipeline.
    pub pipeline: Arc<RagPipeline>,
    /// Extractor for raw text submissions.
    pub text_extractor: TextExtractor,
    /// Extractor for uploaded files.
    pub file_extractor: FileExtractor,
    /// Extractor for web pages; starts a scoped browser session per call.
    pub url_extractor: Arc<UrlExtractor>,
    /// Whether error responses may include underlying failure details.
    pub expose_error_details: bool,
}

impl AppState {
    /// Build a 500 error for this deployment's detail-exposure policy.
    pub fn processing_error(
        &self,
        message: impl Into<String>,
        source: impl std::fmt::Display,
    ) -> ApiError {
        ApiError::processing(message, source, self.expose_error_details)
    }
}
