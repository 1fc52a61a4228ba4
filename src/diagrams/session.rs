//! Rendering one diagram in a headless engine.
//!
//! A job runs through a fixed protocol: build a minimal host document, load
//! it into a rendering context, wait for the diagram markup to settle, read
//! back the vector markup and fall back to a raster capture of the container
//! when no usable markup appears. The context is released whatever happens.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::{DiagramsConfig, Isolation};
use crate::util::escape_html;

use super::DiagramJob;
use super::output::Artifact;

/// CSS selector of the element the diagram engine renders into.
pub const DIAGRAM_SELECTOR: &str = ".mermaid";

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("failed to launch rendering engine: {0}")]
    Launch(String),

    #[error("failed to open rendering context: {0}")]
    Context(String),

    #[error("loading the host document timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to load host document: {0}")]
    Load(String),

    #[error("diagram container not found in rendered page")]
    MissingContainer,

    #[error("diagram engine rejected the diagram source")]
    InvalidDiagram,

    #[error("failed to capture diagram: {0}")]
    Capture(String),

    #[error("failed to shut down rendering engine: {0}")]
    Shutdown(String),
}

/// An isolated page-like environment a single diagram renders in.
#[allow(async_fn_in_trait)]
pub trait RenderContext {
    /// Replace the context's document with `html`.
    async fn load(&mut self, html: &str) -> Result<(), SessionError>;

    /// Inner markup of the diagram container; `None` when there is none.
    async fn container_markup(&mut self) -> Result<Option<String>, SessionError>;

    /// Raster capture (PNG) of the diagram container's bounding box.
    async fn capture_container(&mut self) -> Result<Vec<u8>, SessionError>;

    async fn close(self) -> Result<(), SessionError>;
}

/// A rendering engine process hosting any number of contexts.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    type Context: RenderContext;

    async fn open_context(&self) -> Result<Self::Context, SessionError>;

    /// Stop the engine. Called once, after every context is closed.
    async fn shutdown(self) -> Result<(), SessionError>;
}

/// Bounds for loading a host document and waiting on the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimings {
    pub navigation: Duration,
    pub settle_poll: Duration,
    pub settle_max: Duration,
}

impl RenderTimings {
    pub fn from_config(config: &DiagramsConfig) -> Self {
        Self {
            navigation: Duration::from_millis(config.navigation_timeout_ms),
            settle_poll: Duration::from_millis(config.settle_poll_ms),
            settle_max: Duration::from_millis(config.settle_max_ms),
        }
    }
}

/// Hands out rendering contexts according to an [`Isolation`] strategy.
///
/// With `PerJob` every acquire opens a fresh context and every release
/// closes it. With `Shared` one context is kept between jobs; a context that
/// saw a failure is closed and replaced on the next acquire.
pub struct ContextPool<'e, E: RenderEngine> {
    engine: &'e E,
    isolation: Isolation,
    idle: Option<E::Context>,
}

impl<'e, E: RenderEngine> ContextPool<'e, E> {
    pub fn new(engine: &'e E, isolation: Isolation) -> Self {
        Self {
            engine,
            isolation,
            idle: None,
        }
    }

    pub async fn acquire(&mut self) -> Result<E::Context, SessionError> {
        match self.idle.take() {
            Some(context) => Ok(context),
            None => self.engine.open_context().await,
        }
    }

    /// Return a context after a job. `healthy` is false when the job failed.
    pub async fn release(&mut self, context: E::Context, healthy: bool) {
        if self.isolation == Isolation::Shared && healthy {
            self.idle = Some(context);
            return;
        }
        if let Err(e) = context.close().await {
            tracing::warn!(error = %e, "Failed to close rendering context");
        }
    }

    /// Close the kept context, if any.
    pub async fn drain(&mut self) {
        if let Some(context) = self.idle.take()
            && let Err(e) = context.close().await
        {
            tracing::warn!(error = %e, "Failed to close rendering context");
        }
    }
}

/// Renders diagram jobs one at a time through a [`ContextPool`].
pub struct RenderSession<'e, E: RenderEngine> {
    pool: ContextPool<'e, E>,
    engine_url: String,
    timings: RenderTimings,
}

impl<'e, E: RenderEngine> RenderSession<'e, E> {
    pub fn new(
        engine: &'e E,
        isolation: Isolation,
        engine_url: impl Into<String>,
        timings: RenderTimings,
    ) -> Self {
        Self {
            pool: ContextPool::new(engine, isolation),
            engine_url: engine_url.into(),
            timings,
        }
    }

    /// Render one job. The context is released on every path.
    pub async fn render(&mut self, job: &DiagramJob) -> Result<Artifact, SessionError> {
        let html = host_document(&job.diagram_source, &self.engine_url);
        let mut context = self.pool.acquire().await?;
        let result = self.render_in(&mut context, &html).await;
        self.pool.release(context, result.is_ok()).await;
        result
    }

    /// Close any context kept between jobs.
    pub async fn finish(mut self) {
        self.pool.drain().await;
    }

    async fn render_in(
        &self,
        context: &mut E::Context,
        html: &str,
    ) -> Result<Artifact, SessionError> {
        let navigation = self.timings.navigation;
        tokio::time::timeout(navigation, context.load(html))
            .await
            .map_err(|_| SessionError::Timeout(navigation))??;

        match self.settle(context).await? {
            Settled::Vector(svg) => Ok(Artifact::Svg(svg)),
            Settled::Unrendered => {
                tracing::warn!(
                    settle_max = ?self.timings.settle_max,
                    "Diagram did not render in time, capturing the raw container"
                );
                Ok(Artifact::Png(context.capture_container().await?))
            }
            Settled::Unreadable => {
                tracing::debug!("No vector markup, capturing container");
                Ok(Artifact::Png(context.capture_container().await?))
            }
        }
    }

    /// Poll the container until its vector markup reads the same twice in a
    /// row, or the settle bound runs out.
    async fn settle(&self, context: &mut E::Context) -> Result<Settled, SessionError> {
        let deadline = Instant::now() + self.timings.settle_max;
        let mut previous: Option<String> = None;

        loop {
            let markup = match context.container_markup().await {
                Ok(Some(markup)) => markup.trim().to_string(),
                Ok(None) => return Err(SessionError::MissingContainer),
                Err(e) => {
                    tracing::debug!(error = %e, "Vector extraction failed");
                    return Ok(Settled::Unreadable);
                }
            };

            if is_error_diagram(&markup) {
                return Err(SessionError::InvalidDiagram);
            }
            if is_vector(&markup) && previous.as_deref() == Some(markup.as_str()) {
                return Ok(Settled::Vector(markup));
            }

            if Instant::now() >= deadline {
                return Ok(if is_vector(&markup) {
                    Settled::Vector(markup)
                } else {
                    Settled::Unrendered
                });
            }
            previous = Some(markup);
            tokio::time::sleep(self.timings.settle_poll).await;
        }
    }
}

/// What the container held once polling stopped.
#[derive(Debug, PartialEq, Eq)]
enum Settled {
    /// Vector markup, stable or the last read before the deadline.
    Vector(String),
    /// Still the diagram source when the settle bound ran out.
    Unrendered,
    /// The markup could not be read at all.
    Unreadable,
}

/// Minimal page that renders `source` on load.
pub fn host_document(source: &str, engine_url: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <style>body{{margin:0;padding:0;}} .mermaid{{display:inline-block;}}</style>\
         </head><body><div class=\"mermaid\">{}</div>\
         <script src=\"{}\"></script>\
         <script>mermaid.initialize({{startOnLoad:true, securityLevel:'loose'}});</script>\
         </body></html>",
        escape_html(source),
        escape_html(engine_url)
    )
}

fn is_vector(markup: &str) -> bool {
    markup.starts_with("<svg")
}

/// The engine renders parse failures as an error diagram instead of failing.
fn is_error_diagram(markup: &str) -> bool {
    markup.contains("aria-roledescription=\"error\"") || markup.contains("Syntax error in text")
}
