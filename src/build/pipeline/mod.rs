//! Page pipeline for host documents.
//!
//! The pipeline transforms host pages through a series of stages:
//! 1. Load (parse the host page, read the embedded markdown payload)
//! 2. Sanitize (markdown to trusted HTML inside `#content`)
//! 3. Accordion (Q&A headings into collapsible widgets)
//! 4. Highlight (code blocks and diagram containers)
//! 5. Toc (anchor ids and the outline list)
//! 6. Scroll (outline annotations for scroll tracking)
//! 7. Write (serialize and write to the output directory)
//!
//! The outline must be built after the accordion pass so absorbed
//! Q-headings never show up in it. Stages can be appended or removed by name.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingDocument;
pub use error::PipelineError;

use stages::{
    AccordionStage, HighlightStage, LoadStage, SanitizeStage, ScrollStage, TocStage, WriteStage,
};

/// A stage in the page pipeline.
///
/// Stages transform documents sequentially. Each stage receives all documents
/// and can modify them in place before passing to the next stage.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used by `remove_stage`).
    fn name(&self) -> &'static str;

    /// Process documents through this stage.
    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// The page processing pipeline.
///
/// The default pipeline is: load → sanitize → accordion → highlight → toc →
/// scroll → write.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(LoadStage);
        pipeline.add_stage(SanitizeStage);
        pipeline.add_stage(AccordionStage);
        pipeline.add_stage(HighlightStage);
        pipeline.add_stage(TocStage);
        pipeline.add_stage(ScrollStage);
        pipeline.add_stage(WriteStage);
        pipeline
    }

    /// Load and write only, leaving `#content` for a later prerender.
    pub fn host_only() -> Self {
        let mut pipeline = Self::default_pipeline();
        for name in ["sanitize", "accordion", "highlight", "toc", "scroll"] {
            pipeline.remove_stage(name);
        }
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Remove the named stage, if present.
    pub fn remove_stage(&mut self, name: &str) -> &mut Self {
        self.stages.retain(|s| s.name() != name);
        self
    }

    /// Run the pipeline on a set of documents.
    pub fn run(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), documents = docs.len(), "Running stage");
            stage.process(docs, ctx)?;
        }
        Ok(())
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dom;
    use crate::build::highlight::CodeHighlighter;
    use crate::build::sanitize::MarkdownSanitizer;
    use crate::config::PagesConfig;

    const MARKDOWN: &str = "# Proxy\n\n\
        ## Intent\n\nControl access.\n\n\
        ## Common Interview Questions\n\n\
        ### Q1: What is a proxy?\n\nA stand-in.\n\n\
        ### Q2: Proxy vs decorator?\n\nIntent differs.\n\n\
        ```java\nclass A {}\n```\n\n\
        ## Summary\n\nDone. <img src=x onerror=alert(1)>\n";

    fn host_page(markdown: &str) -> String {
        let payload = serde_json::to_string(markdown).unwrap();
        format!(
            "<!doctype html><html><head><title>Proxy</title></head><body>\
             <ul id=\"toc-list\"></ul><article id=\"content\"></article>\
             <script id=\"md-data\" type=\"application/json\">{payload}</script>\
             </body></html>"
        )
    }

    struct Marker;

    impl Stage for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn process(
            &self,
            _docs: &mut [ProcessingDocument],
            _ctx: &PipelineContext,
        ) -> Result<(), PipelineError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_stage_order() {
        let pipeline = Pipeline::default();
        assert_eq!(
            pipeline.stage_names(),
            vec!["load", "sanitize", "accordion", "highlight", "toc", "scroll", "write"]
        );
    }

    #[test]
    fn test_add_and_remove_stages() {
        let mut pipeline = Pipeline::default();
        pipeline.remove_stage("write").add_stage(Marker);
        assert_eq!(
            pipeline.stage_names(),
            vec!["load", "sanitize", "accordion", "highlight", "toc", "scroll", "marker"]
        );
    }

    #[test]
    fn test_host_only_pipeline() {
        assert_eq!(Pipeline::host_only().stage_names(), vec!["load", "write"]);
    }

    #[test]
    fn test_full_pipeline_writes_prerendered_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = PagesConfig::default();
        let sanitizer = MarkdownSanitizer::new(&config.markdown).unwrap();
        let highlighter = CodeHighlighter::new(&config.highlight_theme);
        let ctx = PipelineContext::new(dir.path(), &config, &sanitizer, &highlighter);

        let mut docs = vec![ProcessingDocument::new("proxy.html", host_page(MARKDOWN))];
        Pipeline::default().run(&mut docs, &ctx).unwrap();

        let doc = &docs[0];
        assert_eq!(doc.qa_count, 2);
        let labels: Vec<&str> = doc.outline.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Intent", "Common Interview Questions", "Summary"]);

        let written = std::fs::read_to_string(dir.path().join("proxy.html")).unwrap();
        assert_eq!(Some(&written), doc.output_html.as_ref());
        assert!(written.contains("class=\"qa-section\""));
        assert!(written.contains("href=\"#heading-0\""));
        assert!(written.contains("data-scroll-threshold=\"100\""));
        assert!(!written.contains("onerror"));

        let reparsed = dom::parse(&written);
        let content = dom::find_by_id(&reparsed.document, "content").unwrap();
        let leftover: Vec<String> = dom::select_tags(&content, &["h3"])
            .iter()
            .map(dom::text_content)
            .collect();
        assert!(leftover.is_empty(), "Q-headings left behind: {leftover:?}");
    }

    #[test]
    fn test_page_without_payload_renders_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let config = PagesConfig::default();
        let sanitizer = MarkdownSanitizer::new(&config.markdown).unwrap();
        let highlighter = CodeHighlighter::default();
        let ctx = PipelineContext::new(dir.path(), &config, &sanitizer, &highlighter);

        let host = "<html><body><ul id=\"toc-list\"></ul><article id=\"content\"></article></body></html>";
        let mut docs = vec![ProcessingDocument::new("empty.html", host.to_string())];
        Pipeline::default().run(&mut docs, &ctx).unwrap();

        assert_eq!(docs[0].qa_count, 0);
        assert!(docs[0].outline.is_empty());
        assert!(dir.path().join("empty.html").exists());
    }
}
