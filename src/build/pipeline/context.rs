//! Pipeline context for sharing state across stages.

use std::path::Path;

use crate::build::highlight::CodeHighlighter;
use crate::build::sanitize::MarkdownSanitizer;
use crate::config::PagesConfig;

/// Shared context for pipeline stages.
///
/// Contains all resources and configuration needed by stages during processing.
pub struct PipelineContext<'a> {
    /// Directory where output files are written
    pub output_dir: &'a Path,

    /// Heading the Q&A section is placed after
    pub marker_heading: &'a str,

    /// Viewport offset at which an outline entry becomes active
    pub scroll_threshold: f64,

    /// Markdown engine and HTML sanitizer
    pub sanitizer: &'a MarkdownSanitizer,

    /// Syntax highlighter for code blocks
    pub highlighter: &'a CodeHighlighter,
}

impl<'a> PipelineContext<'a> {
    /// Create a new pipeline context.
    pub fn new(
        output_dir: &'a Path,
        pages: &'a PagesConfig,
        sanitizer: &'a MarkdownSanitizer,
        highlighter: &'a CodeHighlighter,
    ) -> Self {
        Self {
            output_dir,
            marker_heading: &pages.marker_heading,
            scroll_threshold: pages.scroll_threshold,
            sanitizer,
            highlighter,
        }
    }
}
