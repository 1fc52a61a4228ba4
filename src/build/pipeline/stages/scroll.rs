//! Scroll tracking stage.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::build::scroll::ScrollSync;

/// Stage that annotates the outline list for scroll tracking.
pub struct ScrollStage;

impl Stage for ScrollStage {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            if let Some(list) = doc.toc_list(self.name())? {
                ScrollSync::new(&doc.outline, ctx.scroll_threshold).bind(&list);
            }
        }
        Ok(())
    }
}
