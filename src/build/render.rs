use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

/// Page runtime inlined into every generated host page.
pub const RUNTIME_SCRIPT: &str = include_str!("../../assets/patternbook.js");

const DEFAULT_PAGE_TEMPLATE: &str = include_str!("../../assets/page.html");
const PAGE_TEMPLATE_NAME: &str = "page.html";
const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");
const INDEX_TEMPLATE_NAME: &str = "index.html";

/// Page every pattern page links back to.
pub const INDEX_PAGE: &str = "All_Design_Patterns_index.html";

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to encode payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The host page renderer, wrapping Tera.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a renderer from a custom page template file, or the bundled
    /// one. The index template is always the bundled one.
    pub fn new(template: Option<&Path>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        match template {
            Some(path) => {
                if !path.exists() {
                    return Err(RenderError::TemplateNotFound(path.display().to_string()));
                }
                tera.add_template_file(path, Some(PAGE_TEMPLATE_NAME))?;
            }
            None => tera.add_raw_template(PAGE_TEMPLATE_NAME, DEFAULT_PAGE_TEMPLATE)?,
        }
        Ok(Self { tera })
    }

    /// Render a host page with the given context.
    pub fn render_page(&self, context: &PageContext) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("page", &context.page);
        tera_context.insert("uml", &context.uml);
        tera_context.insert("payload", &embed_payload(&context.markdown)?);
        tera_context.insert("stylesheets", &context.stylesheets);
        tera_context.insert("engine_url", &context.engine_url);
        tera_context.insert("runtime", RUNTIME_SCRIPT);

        Ok(self.tera.render(PAGE_TEMPLATE_NAME, &tera_context)?)
    }

    /// Render the listing page every pattern page links back to.
    pub fn render_index(&self, context: &IndexContext) -> Result<String, RenderError> {
        let tera_context = Context::from_serialize(context)?;
        Ok(self.tera.render(INDEX_TEMPLATE_NAME, &tera_context)?)
    }
}

/// Encode markdown as a JSON string literal that can sit inside a
/// `<script>` element without terminating it.
pub fn embed_payload(markdown: &str) -> Result<String, RenderError> {
    Ok(serde_json::to_string(markdown)?.replace('<', "\\u003c"))
}

/// Context passed to the host page template.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub page: PageInfo,
    pub uml: Option<UmlSection>,
    /// Raw markdown, embedded as the page payload
    pub markdown: String,
    pub stylesheets: Vec<String>,
    pub engine_url: String,
}

/// Information about the current page.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    /// Link target of the back button
    pub index: String,
}

/// The class diagram shown above the content.
///
/// `image` points at a rendered artifact; without one, `source` carries the
/// diagram source for the in-page engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UmlSection {
    pub image: Option<String>,
    pub source: Option<String>,
}

/// Context passed to the index template.
#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub stylesheets: Vec<String>,
    pub categories: Vec<CategoryListing>,
}

/// One category section of the index, patterns in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub name: String,
    /// Fragment id of the section
    pub anchor: String,
    pub patterns: Vec<PatternCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCard {
    pub title: String,
    pub summary: String,
    /// Page file name, relative to the index
    pub href: String,
}
