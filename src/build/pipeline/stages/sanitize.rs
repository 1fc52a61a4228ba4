//! Markdown rendering and sanitization stage.

use crate::build::dom;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that renders the payload to sanitized HTML and places it in
/// `#content`, replacing whatever the host page had there.
pub struct SanitizeStage;

impl Stage for SanitizeStage {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let Some(content) = doc.content(self.name())? else {
                tracing::warn!(page = %doc.file_name, "Host page has no #content element, skipping");
                continue;
            };

            let html = ctx.sanitizer.sanitize(doc.document.payload.as_deref());
            dom::clear_children(&content);
            for node in dom::parse_fragment(&html) {
                dom::append(&content, &node);
            }
        }
        Ok(())
    }
}
