//! Headless Chromium rendering engine.
//!
//! One browser process serves the whole batch; each rendering context is a
//! separate page (tab) in it.

use std::path::Path;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::session::{DIAGRAM_SELECTOR, RenderContext, RenderEngine, SessionError};

pub struct ChromiumEngine {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumEngine {
    /// Start a headless browser. `executable` overrides auto-detection.
    pub async fn launch(executable: Option<&Path>) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu");
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        // The handler drives the devtools connection and must be polled for
        // as long as the browser is in use.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "Browser connection event failed");
                }
            }
        });

        tracing::debug!("Launched headless browser");
        Ok(Self { browser, handler })
    }
}

impl RenderEngine for ChromiumEngine {
    type Context = ChromiumContext;

    async fn open_context(&self) -> Result<ChromiumContext, SessionError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Context(e.to_string()))?;
        Ok(ChromiumContext { page })
    }

    async fn shutdown(mut self) -> Result<(), SessionError> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| SessionError::Shutdown(e.to_string()));
        let waited = self
            .browser
            .wait()
            .await
            .map_err(|e| SessionError::Shutdown(e.to_string()));
        self.handler.abort();
        closed?;
        waited?;
        tracing::debug!("Browser closed");
        Ok(())
    }
}

pub struct ChromiumContext {
    page: Page,
}

#[cfg(test)]
impl ChromiumContext {
    pub(crate) fn page(&self) -> &Page {
        &self.page
    }
}

impl RenderContext for ChromiumContext {
    async fn load(&mut self, html: &str) -> Result<(), SessionError> {
        self.page
            .set_content(html)
            .await
            .map_err(|e| SessionError::Load(e.to_string()))?;
        Ok(())
    }

    async fn container_markup(&mut self) -> Result<Option<String>, SessionError> {
        let Ok(element) = self.page.find_element(DIAGRAM_SELECTOR).await else {
            return Ok(None);
        };
        let markup = element
            .inner_html()
            .await
            .map_err(|e| SessionError::Capture(e.to_string()))?;
        Ok(Some(markup.unwrap_or_default()))
    }

    async fn capture_container(&mut self) -> Result<Vec<u8>, SessionError> {
        let element = self
            .page
            .find_element(DIAGRAM_SELECTOR)
            .await
            .map_err(|_| SessionError::MissingContainer)?;
        element
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(|e| SessionError::Capture(e.to_string()))
    }

    async fn close(self) -> Result<(), SessionError> {
        self.page
            .close()
            .await
            .map_err(|e| SessionError::Context(e.to_string()))
    }
}
