//! File writing stage.
//!
//! Serializes the transformed page and writes it to the filesystem.

use crate::build::dom;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that writes processed pages to the output directory.
///
/// Existing files are overwritten; parent directories are created.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let html = dom::document_html(doc.parsed(self.name())?);

            let output_path = ctx.output_dir.join(&doc.file_name);
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&output_path, &html).map_err(|source| PipelineError::Write {
                path: output_path.clone(),
                source,
            })?;

            tracing::debug!(path = %output_path.display(), "Wrote page");
            doc.output_html = Some(html);
        }
        Ok(())
    }
}
