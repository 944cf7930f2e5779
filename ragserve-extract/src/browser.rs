//! Scoped headless-browser session over WebDriver.

use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::{ExtractError, Result};

/// Removes page chrome and returns the remaining visible text.
const VISIBLE_TEXT_SCRIPT: &str = r#"
    const elements = document.querySelectorAll('script, style, nav, footer, header');
    elements.forEach(el => el.remove());
    return document.body ? document.body.innerText : '';
"#;

/// A single-use browser session bound to one extraction request.
///
/// Started per request and closed on every exit path; never shared or
/// reused across requests. The caller is expected to bound
/// [`page_text`](BrowserSession::page_text) with a deadline.
pub struct BrowserSession {
    driver: WebDriver,
}

impl BrowserSession {
    /// Start a headless Chrome session against the given WebDriver endpoint.
    pub async fn start(webdriver_url: &str, page_load_timeout: Duration) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless=new").map_err(Self::map_err)?;
        caps.add_arg("--no-sandbox").map_err(Self::map_err)?;
        caps.add_arg("--disable-setuid-sandbox").map_err(Self::map_err)?;

        let driver = WebDriver::new(webdriver_url, caps).await.map_err(Self::map_err)?;
        driver.set_page_load_timeout(page_load_timeout).await.map_err(Self::map_err)?;

        debug!(webdriver = webdriver_url, "browser session started");
        Ok(Self { driver })
    }

    /// Navigate to `url`, wait for the document to finish loading, strip
    /// script/style/nav/header/footer elements, and return the page's
    /// visible text.
    pub async fn page_text(&self, url: &str) -> Result<String> {
        self.driver.goto(url).await.map_err(Self::map_err)?;

        // goto returns when the load event fires under most drivers, but
        // poll readyState to cover drivers with eager page-load strategy.
        loop {
            let ready = self
                .driver
                .execute("return document.readyState", Vec::new())
                .await
                .map_err(Self::map_err)?;
            let state: String = ready.convert().unwrap_or_default();
            if state == "complete" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }

        let ret = self
            .driver
            .execute(VISIBLE_TEXT_SCRIPT, Vec::new())
            .await
            .map_err(Self::map_err)?;
        let text: String = ret.convert().map_err(Self::map_err)?;

        debug!(url, text_len = text.len(), "extracted page text");
        Ok(text)
    }

    /// Close the session, quitting the browser.
    pub async fn close(self) -> Result<()> {
        self.driver.quit().await.map_err(Self::map_err)
    }

    fn map_err(e: WebDriverError) -> ExtractError {
        ExtractError::Browser(e.to_string())
    }
}
