//! Q&A accordion stage.

use crate::build::accordion::AccordionTransformer;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that restructures `Q<n>:` headings into accordion widgets.
pub struct AccordionStage;

impl Stage for AccordionStage {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let transformer = AccordionTransformer::new(ctx.marker_heading);
        for doc in docs {
            if let Some(content) = doc.content(self.name())? {
                doc.qa_count = transformer.transform(&content);
            }
        }
        Ok(())
    }
}
