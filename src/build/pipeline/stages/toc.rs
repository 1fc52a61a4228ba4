//! Outline building stage.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::build::toc::TocBuilder;

/// Stage that assigns heading anchors and renders the outline list.
///
/// Runs after the accordion stage so absorbed headings are already gone.
pub struct TocStage;

impl Stage for TocStage {
    fn name(&self) -> &'static str {
        "toc"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let Some(content) = doc.content(self.name())? else {
                continue;
            };
            doc.outline = TocBuilder::build(&content);

            if let Some(list) = doc.toc_list(self.name())? {
                TocBuilder::render_list(&list, &doc.outline);
            }
        }
        Ok(())
    }
}
