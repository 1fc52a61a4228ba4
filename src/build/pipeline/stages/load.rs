//! Host page loading stage.

use crate::build::loader::ContentLoader;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that parses each host page and reads its title and payload.
///
/// A missing payload element is not an error; later stages render an empty
/// document for it.
pub struct LoadStage;

impl Stage for LoadStage {
    fn name(&self) -> &'static str {
        "load"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let parsed = ContentLoader::parse(&doc.host_html);
            doc.document = ContentLoader::load(&parsed);
            if doc.document.payload.is_none() {
                tracing::debug!(page = %doc.file_name, "Host page has no payload element");
            }
            doc.dom = Some(parsed);
        }
        Ok(())
    }
}
