//! Error types for the `ragserve-extract` crate.

use thiserror::Error;

/// Errors that can occur during content extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input text was empty or blank after trimming.
    #[error("no content to extract")]
    EmptyContent,

    /// A file produced zero documents.
    #[error("no content found in the file")]
    EmptyDocument,

    /// The declared media type is not supported.
    #[error("unsupported file type: {0}")]
    UnsupportedMediaType(String),

    /// The input was not a syntactically valid http(s) URL.
    #[error("Invalid URL format")]
    InvalidUrl(String),

    /// Navigation did not finish within the configured deadline.
    #[error("navigation to '{url}' timed out after {timeout_secs}s")]
    NavigationTimeout {
        /// The URL being fetched.
        url: String,
        /// The deadline that expired.
        timeout_secs: u64,
    },

    /// A failure in the headless browser session.
    #[error("browser error: {0}")]
    Browser(String),

    /// A failure parsing a PDF file.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A filesystem failure while reading an uploaded file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
