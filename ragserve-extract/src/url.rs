//! Web-page extraction via a headless browser.

use std::collections::HashMap;
use std::time::Duration;

use ragserve_core::Document;
use tracing::warn;
use url::Url;

use crate::browser::BrowserSession;
use crate::error::{ExtractError, Result};

/// Default bound on navigation plus extraction.
const DEFAULT_NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a URL in a headless browser and extracts its visible text as a
/// single [`Document`].
///
/// Each call starts a fresh [`BrowserSession`] and closes it on success,
/// failure, and timeout alike; no browser state survives a request.
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    webdriver_url: String,
    timeout: Duration,
}

impl UrlExtractor {
    /// Create a new extractor talking to the given WebDriver endpoint.
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self { webdriver_url: webdriver_url.into(), timeout: DEFAULT_NAV_TIMEOUT }
    }

    /// Override the navigation deadline (default 30s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate that `url` is a well-formed http(s) URL.
    ///
    /// Exposed separately so the HTTP boundary can reject malformed URLs
    /// before a browser session is ever started.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidUrl`] for unparsable input or
    /// non-http(s) schemes.
    pub fn validate(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|_| ExtractError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ExtractError::InvalidUrl(url.to_string()));
        }
        Ok(parsed)
    }

    /// Fetch `url` and return its visible text as one document with
    /// `source = url` metadata.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidUrl`] for malformed input
    /// - [`ExtractError::NavigationTimeout`] when the deadline expires
    /// - [`ExtractError::EmptyContent`] when the page has no visible text
    /// - [`ExtractError::Browser`] for any other session failure
    pub async fn extract(&self, url: &str) -> Result<Vec<Document>> {
        Self::validate(url)?;

        let session = BrowserSession::start(&self.webdriver_url, self.timeout).await?;
        let outcome = tokio::time::timeout(self.timeout, session.page_text(url)).await;

        // The session is closed before the outcome is inspected so no
        // browser instance survives an error path.
        if let Err(e) = session.close().await {
            warn!(url, error = %e, "failed to close browser session");
        }

        let timeout_secs = self.timeout.as_secs();
        let text = match outcome {
            Err(_) => {
                return Err(ExtractError::NavigationTimeout { url: url.to_string(), timeout_secs })
            }
            Ok(Err(ExtractError::Browser(msg))) if msg.to_lowercase().contains("timeout") => {
                return Err(ExtractError::NavigationTimeout { url: url.to_string(), timeout_secs })
            }
            Ok(Err(e)) => return Err(e),
            Ok(Ok(text)) => text,
        };

        if text.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let metadata = HashMap::from([("source".to_string(), url.to_string())]);
        Ok(vec![Document::new(text, metadata)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(matches!(
            UrlExtractor::validate("not a url"),
            Err(ExtractError::InvalidUrl(_))
        ));
        assert!(matches!(UrlExtractor::validate(""), Err(ExtractError::InvalidUrl(_))));
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(matches!(
            UrlExtractor::validate("ftp://example.com/file"),
            Err(ExtractError::InvalidUrl(_))
        ));
        assert!(matches!(
            UrlExtractor::validate("file:///etc/passwd"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }

    #[test]
    fn http_and_https_urls_are_accepted() {
        assert!(UrlExtractor::validate("https://example.com/page?q=1").is_ok());
        assert!(UrlExtractor::validate("http://localhost:8080").is_ok());
    }
}
