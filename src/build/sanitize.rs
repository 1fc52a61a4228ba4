//! Markdown rendering and HTML sanitizing.

use pulldown_cmark::{Options, Parser, html};

use crate::config::MarkdownConfig;

#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Turns an untrusted markdown payload into HTML that is safe to insert
/// into a live document.
pub struct MarkdownSanitizer {
    options: Options,
}

impl MarkdownSanitizer {
    pub fn new(markdown_config: &MarkdownConfig) -> Result<Self, SanitizeError> {
        let mut options = Options::empty();
        for extension in &markdown_config.extensions {
            match extension.as_str() {
                "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
                "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
                "gfm" => options.insert(Options::ENABLE_GFM),
                "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
                "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
                "tables" => options.insert(Options::ENABLE_TABLES),
                "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
                other => return Err(SanitizeError::InvalidExtension(other.to_string())),
            }
        }
        Ok(Self { options })
    }

    /// Render and sanitize. An absent payload yields an empty string.
    pub fn sanitize(&self, payload: Option<&str>) -> String {
        let markdown = payload.unwrap_or_default();
        if markdown.is_empty() {
            return String::new();
        }

        let mut rendered = String::new();
        html::push_html(&mut rendered, Parser::new_ext(markdown, self.options));

        clean_html(&rendered)
    }
}

/// Sanitize HTML with the default allow-list, plus `target` on links so they
/// may open in a new context, and `class` on `code` so the fence language
/// survives for the highlighter.
pub fn clean_html(html: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("a", &["target"])
        .add_tag_attributes("code", &["class"])
        .clean(html)
        .to_string()
}
