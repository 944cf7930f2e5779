//! Content extraction for ragserve.
//!
//! Turns an input source into plain-text [`Document`]s ready for the RAG
//! pipeline. Three independent extractors cover the supported sources:
//!
//! - [`TextExtractor`] wraps a literal string as one document
//! - [`FileExtractor`] reads PDF (one document per page) and plain-text
//!   files, dispatched on the declared media type
//! - [`UrlExtractor`] renders a page in a scoped headless-browser session
//!   and extracts its visible text
//!
//! The HTTP route selects the extractor; there is no runtime type
//! inspection of the source.
//!
//! [`Document`]: ragserve_core::Document

pub mod browser;
pub mod error;
pub mod file;
pub mod text;
pub mod url;

pub use browser::BrowserSession;
pub use error::{ExtractError, Result};
pub use file::FileExtractor;
pub use text::TextExtractor;
pub use url::UrlExtractor;
