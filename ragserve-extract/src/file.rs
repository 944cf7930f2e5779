//! Uploaded-file extraction: PDF and plain text.

use std::collections::HashMap;
use std::path::Path;

use ragserve_core::Document;
use tracing::debug;

use crate::error::{ExtractError, Result};

/// Extracts [`Document`]s from an uploaded file, dispatching on the
/// declared media type.
///
/// Supported types: `application/pdf` (one document per page, with `page`
/// metadata) and `text/plain` (one document). The caller owns the file's
/// on-disk lifetime; this extractor only reads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    /// Create a new file extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract documents from the file at `path`.
    ///
    /// `media_type` is the type declared by the upload, not sniffed from
    /// the content. `file_name` is recorded as `source` metadata.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::UnsupportedMediaType`] for anything other than
    ///   `application/pdf` or `text/plain`
    /// - [`ExtractError::EmptyDocument`] when the file yields zero
    ///   documents (zero-page PDF, blank text file)
    /// - [`ExtractError::Pdf`] / [`ExtractError::Io`] on parse and read
    ///   failures
    pub fn extract(&self, path: &Path, media_type: &str, file_name: &str) -> Result<Vec<Document>> {
        let documents = match media_type {
            "application/pdf" => self.extract_pdf(path, file_name)?,
            "text/plain" => self.extract_plain_text(path, file_name)?,
            other => return Err(ExtractError::UnsupportedMediaType(other.to_string())),
        };

        if documents.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        debug!(file = file_name, media_type, count = documents.len(), "extracted file");
        Ok(documents)
    }

    /// One document per page; blank pages are skipped.
    fn extract_pdf(&self, path: &Path, file_name: &str) -> Result<Vec<Document>> {
        let pdf = lopdf::Document::load(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let mut documents = Vec::new();
        for page_number in pdf.get_pages().keys() {
            let text = pdf
                .extract_text(&[*page_number])
                .map_err(|e| ExtractError::Pdf(format!("page {page_number}: {e}")))?;
            if text.trim().is_empty() {
                continue;
            }

            let metadata = HashMap::from([
                ("source".to_string(), file_name.to_string()),
                ("page".to_string(), page_number.to_string()),
            ]);
            documents.push(Document::new(text, metadata));
        }

        Ok(documents)
    }

    fn extract_plain_text(&self, path: &Path, file_name: &str) -> Result<Vec<Document>> {
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let metadata = HashMap::from([("source".to_string(), file_name.to_string())]);
        Ok(vec![Document::new(text, metadata)])
    }
}
