//! Raw-text extraction.

use std::collections::HashMap;

use ragserve_core::Document;

use crate::error::{ExtractError, Result};

/// Wraps a literal string as a single [`Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self
    }

    /// Wrap `text` as one document with `source = "text"` metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::EmptyContent`] if the input is blank after
    /// trimming.
    pub fn extract(&self, text: &str) -> Result<Vec<Document>> {
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let metadata = HashMap::from([("source".to_string(), "text".to_string())]);
        Ok(vec![Document::new(text, metadata)])
    }
}
