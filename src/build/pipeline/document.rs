//! Document types for pipeline processing.

use markup5ever_rcdom::{Handle, RcDom};

use crate::build::dom;
use crate::build::loader::Document;
use crate::build::toc::{OutlineEntry, TOC_LIST_ID};

use super::PipelineError;

/// Id of the element the rendered markdown is placed in.
pub const CONTENT_ELEMENT_ID: &str = "content";

/// A host page being processed through the pipeline.
///
/// State evolves through the stages:
///
/// 1. Initially: only `host_html` is set
/// 2. After load: `dom` and `document` are populated
/// 3. After accordion / toc: `qa_count` and `outline` are populated
/// 4. After write: `output_html` holds the serialized page
pub struct ProcessingDocument {
    /// Output file name, relative to the output directory
    pub file_name: String,

    /// The host page as read from disk or rendered from the template
    pub host_html: String,

    /// Parsed host page. `None` until the load stage runs.
    pub dom: Option<RcDom>,

    /// Title and raw payload read from the host page
    pub document: Document,

    /// Number of accordion widgets built
    pub qa_count: usize,

    /// Number of code blocks replaced by the highlighter
    pub highlighted: usize,

    /// Outline of the final content
    pub outline: Vec<OutlineEntry>,

    /// Final HTML output. `None` until the write stage runs.
    pub output_html: Option<String>,
}

impl ProcessingDocument {
    pub fn new(file_name: impl Into<String>, host_html: String) -> Self {
        Self {
            file_name: file_name.into(),
            host_html,
            dom: None,
            document: Document::default(),
            qa_count: 0,
            highlighted: 0,
            outline: Vec::new(),
            output_html: None,
        }
    }

    /// The parsed host page, or an error naming the stage that needed it.
    pub fn parsed(&self, stage: &str) -> Result<&RcDom, PipelineError> {
        self.dom.as_ref().ok_or_else(|| {
            PipelineError::stage(
                stage,
                format!("document '{}' was not loaded (was load stage run?)", self.file_name),
            )
        })
    }

    /// The `#content` container, if the host page has one.
    pub fn content(&self, stage: &str) -> Result<Option<Handle>, PipelineError> {
        let parsed = self.parsed(stage)?;
        Ok(dom::find_by_id(&parsed.document, CONTENT_ELEMENT_ID))
    }

    /// The `#toc-list` element, if the host page has one.
    pub fn toc_list(&self, stage: &str) -> Result<Option<Handle>, PipelineError> {
        let parsed = self.parsed(stage)?;
        Ok(dom::find_by_id(&parsed.document, TOC_LIST_ID))
    }
}
