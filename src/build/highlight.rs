use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};
use markup5ever_rcdom::Handle;

use super::dom;
use crate::util::escape_html;

/// Fence language handed to the diagram engine instead of the highlighter.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// A syntax highlighter using autumnus (tree-sitter based).
pub struct CodeHighlighter {
    theme_name: String,
}

impl CodeHighlighter {
    /// Create a new syntax highlighter with the given theme.
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme_name: theme_name.to_string(),
        }
    }

    /// Highlight every `pre > code` block under `container` in place.
    ///
    /// Mermaid blocks become `div.mermaid` so the diagram engine picks them
    /// up on page load. Returns the number of blocks replaced.
    pub fn highlight_blocks(&self, container: &Handle) -> usize {
        let mut replaced = 0;
        for code in dom::select_tags(container, &["code"]) {
            let Some(pre) = dom::parent(&code).filter(|p| dom::is_tag(p, "pre")) else {
                continue;
            };

            let language = declared_language(&code).unwrap_or_default();
            let source = dom::text_content(&code);
            let html = if language == DIAGRAM_LANGUAGE {
                format!("<div class=\"mermaid\">{}</div>", escape_html(&source))
            } else {
                self.highlight(&source, &language)
            };

            let mut anchor = pre.clone();
            for node in dom::parse_fragment(&html) {
                dom::insert_after(&anchor, &node);
                anchor = node;
            }
            dom::detach(&pre);
            replaced += 1;
        }
        replaced
    }

    /// Highlight code and return HTML with CSS classes.
    /// Returns the original code wrapped in a plain `<code>` if the language is not supported.
    pub fn highlight(&self, code: &str, language: &str) -> String {
        // Use Language::guess which handles language detection from name or extension
        let lang = Language::guess(language, code);

        // Check if it's the Plaintext/unknown fallback
        if matches!(lang, Language::PlainText)
            && !language.is_empty()
            && language != "plaintext"
            && language != "text"
        {
            // Language wasn't recognized, use plain code block
            return Self::plain_code_block(code, language);
        }

        let formatter = HtmlLinkedBuilder::new().source(code).lang(lang).build();

        match formatter {
            Ok(f) => {
                let mut output: Vec<u8> = Vec::new();
                if f.format(&mut output).is_ok() {
                    String::from_utf8(output)
                        .unwrap_or_else(|_| Self::plain_code_block(code, language))
                } else {
                    Self::plain_code_block(code, language)
                }
            }
            Err(_) => Self::plain_code_block(code, language),
        }
    }

    /// Generate CSS for the current theme.
    pub fn generate_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme_name).ok()?;
        Some(theme.css(false)) // false = don't enable italic
    }

    /// Create a plain code block without highlighting.
    fn plain_code_block(code: &str, language: &str) -> String {
        let escaped = escape_html(code);
        if language.is_empty() {
            format!("<pre><code>{}</code></pre>", escaped)
        } else {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(language),
                escaped
            )
        }
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new("github-dark")
    }
}

/// The `language-*` class markdown renderers put on fenced code.
fn declared_language(code: &Handle) -> Option<String> {
    dom::attr(code, "class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .map(str::to_string)
}
