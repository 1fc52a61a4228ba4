//! Sequential diagram batch with per-job failure isolation.

use crate::config::Isolation;

use super::extract::{clean_source, extract_diagram};
use super::output::{Artifact, OutputWriter};
use super::session::{RenderEngine, RenderSession, RenderTimings};
use super::{DiagramError, DiagramJob, DiagramSource};

/// Counts reported at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub found: usize,
    pub svg: usize,
    pub png: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn rendered(&self) -> usize {
        self.svg + self.png
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct DiagramBatch {
    pub engine_url: String,
    pub timings: RenderTimings,
    pub isolation: Isolation,
    pub clean_source: bool,
}

impl DiagramBatch {
    /// Read a source file and turn it into a job. `Ok(None)` when the file
    /// has no diagram block.
    pub fn prepare(&self, source: &DiagramSource) -> Result<Option<DiagramJob>, DiagramError> {
        let text = std::fs::read_to_string(&source.path).map_err(|e| DiagramError::ReadSource {
            path: source.path.clone(),
            source: e,
        })?;
        let Some(block) = extract_diagram(&text) else {
            return Ok(None);
        };
        let diagram_source = if self.clean_source {
            clean_source(block)
        } else {
            block.to_string()
        };
        Ok(Some(DiagramJob {
            source_path: source.path.clone(),
            relative: source.relative.clone(),
            diagram_source,
        }))
    }

    /// Render every source in order, writing one artifact per success.
    ///
    /// A failing job is logged and counted; it never stops the batch. The
    /// engine is shut down exactly once, after the last job.
    pub async fn run<E: RenderEngine>(
        &self,
        engine: E,
        sources: &[DiagramSource],
        writer: &OutputWriter,
    ) -> BatchReport {
        let mut report = BatchReport {
            found: sources.len(),
            ..BatchReport::default()
        };

        let mut session =
            RenderSession::new(&engine, self.isolation, self.engine_url.clone(), self.timings);
        for source in sources {
            let display = source.path.display();
            let job = match self.prepare(source) {
                Ok(Some(job)) => job,
                Ok(None) => {
                    println!("No mermaid block in {display}");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    println!("Failed {display}: {e}");
                    report.failed += 1;
                    continue;
                }
            };

            let written = match session.render(&job).await {
                Ok(artifact) => writer
                    .write(&job.relative, &artifact)
                    .map(|path| (artifact, path))
                    .map_err(DiagramError::from),
                Err(e) => Err(DiagramError::from(e)),
            };
            match written {
                Ok((Artifact::Svg(_), path)) => {
                    println!("Rendered SVG {display} -> {}", path.display());
                    report.svg += 1;
                }
                Ok((Artifact::Png(_), path)) => {
                    println!("Rendered PNG fallback {display} -> {}", path.display());
                    report.png += 1;
                }
                Err(e) => {
                    tracing::warn!(source = %source.path.display(), error = %e, "Diagram failed");
                    println!("Failed {display}: {e}");
                    report.failed += 1;
                }
            }
        }
        session.finish().await;

        if let Err(e) = engine.shutdown().await {
            tracing::warn!(error = %e, "Rendering engine did not shut down cleanly");
        }
        report
    }
}
