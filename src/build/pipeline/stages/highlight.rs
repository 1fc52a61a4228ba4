//! Code highlighting stage.

use crate::build::dom;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Id of the `<style>` element carrying the highlight theme.
const THEME_STYLE_ID: &str = "highlight-theme";

/// Stage that highlights fenced code blocks and adds the theme stylesheet
/// to the page head once.
pub struct HighlightStage;

impl Stage for HighlightStage {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let css = ctx.highlighter.generate_css();
        for doc in docs {
            let Some(content) = doc.content(self.name())? else {
                continue;
            };
            doc.highlighted = ctx.highlighter.highlight_blocks(&content);
            if doc.highlighted == 0 {
                continue;
            }

            let parsed = doc.parsed(self.name())?;
            if let Some(css) = &css
                && dom::find_by_id(&parsed.document, THEME_STYLE_ID).is_none()
                && let Some(head) = dom::first_by_tag(&parsed.document, "head")
            {
                let style = dom::element("style", &[("id", THEME_STYLE_ID)]);
                dom::append(&style, &dom::text(css));
                dom::append(&head, &style);
            }
        }
        Ok(())
    }
}
