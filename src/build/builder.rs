use std::path::{Path, PathBuf};

use crate::config::{Config, resolve_path};

use super::highlight::CodeHighlighter;
use super::paths::host_file_name;
use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingDocument};
use super::render::{
    CategoryListing, INDEX_PAGE, IndexContext, PageContext, PageInfo, PatternCard, RenderError,
    Renderer,
};
use super::sanitize::{MarkdownSanitizer, SanitizeError};
use super::source::{DiagramLayout, PatternRoot, SourceError, category_title};
use crate::util::slugify;

/// Heading of the index page.
const INDEX_TITLE: &str = "Design Patterns";

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("markdown config error: {0}")]
    Sanitize(#[from] SanitizeError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("failed to read host page {path}: {source}")]
    ReadHost {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("host page path has no file name: {0}")]
    InvalidHostPath(PathBuf),

    #[error("failed to write index page {path}: {source}")]
    WriteIndex {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub pages: usize,
    pub qa_widgets: usize,
    pub outline_entries: usize,
}

impl BuildResult {
    fn from_docs(output_dir: PathBuf, docs: &[ProcessingDocument]) -> Self {
        Self {
            output_dir,
            pages: docs.len(),
            qa_widgets: docs.iter().map(|d| d.qa_count).sum(),
            outline_entries: docs.iter().map(|d| d.outline.len()).sum(),
        }
    }
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        Self { config, base_path }
    }

    /// Generate one page per pattern folder.
    ///
    /// With `prerender` the pages go through the full pipeline; without it
    /// they are written as host pages whose content is still the embedded
    /// markdown payload, ready for [`Builder::render_hosts`].
    pub fn build_pages(&self, prerender: bool) -> Result<BuildResult, BuildError> {
        let pages = &self.config.pages;

        // Step 1: Discover pattern folders
        let root = PatternRoot::resolve(&self.resolve(&pages.root))?;
        let folders = root.discover()?;
        let display_root = root.path.canonicalize().unwrap_or(root.path.clone());
        println!(
            "Found {} pattern folder(s) in {}",
            folders.len(),
            display_root.display()
        );

        // Step 2: Load the page template
        let template = pages.template.as_ref().map(|t| self.resolve(t));
        let renderer = Renderer::new(template.as_deref())?;

        // Step 3: Render a host page per folder
        let output_dir = self.resolve(&pages.output);
        let layout = DiagramLayout {
            diagram_root: self.resolve(&self.config.diagrams.root),
            artifact_dir: self.resolve(&pages.diagram_dir),
            page_dir: output_dir.clone(),
            subdir: self.config.diagrams.subdir.clone(),
            file_name: self.config.diagrams.file_name.clone(),
        };

        let mut docs = Vec::with_capacity(folders.len());
        let mut categories: Vec<CategoryListing> = Vec::new();
        for folder in &folders {
            let page = folder.load()?;
            let uml = folder.uml_section(&layout)?;
            add_card(
                &mut categories,
                &folder.category(),
                PatternCard {
                    title: page.title.clone(),
                    summary: page.summary.clone(),
                    href: page.file_name.clone(),
                },
            );
            tracing::debug!(
                folder = %folder.path.display(),
                title = %page.title,
                diagram = uml.is_some(),
                "Rendering host page"
            );

            let html = renderer.render_page(&PageContext {
                page: PageInfo {
                    title: page.title,
                    index: INDEX_PAGE.to_string(),
                },
                uml,
                markdown: page.markdown,
                stylesheets: pages.stylesheets.clone(),
                engine_url: self.config.diagrams.engine_url.clone(),
            })?;
            docs.push(ProcessingDocument::new(page.file_name, html));
        }

        // Step 4: Run the pipeline and write
        let pipeline = if prerender {
            Pipeline::default_pipeline()
        } else {
            Pipeline::host_only()
        };
        let result = self.run(&pipeline, &mut docs, output_dir)?;

        // Step 5: Write the index the pages link back to
        let index_html = renderer.render_index(&IndexContext {
            title: INDEX_TITLE.to_string(),
            stylesheets: pages.stylesheets.clone(),
            categories,
        })?;
        let index_path = result.output_dir.join(INDEX_PAGE);
        std::fs::write(&index_path, index_html).map_err(|source| BuildError::WriteIndex {
            path: index_path.clone(),
            source,
        })?;

        let display_output = result
            .output_dir
            .canonicalize()
            .unwrap_or(result.output_dir.clone());
        println!(
            "Wrote {} page(s) to {}",
            result.pages,
            display_output.display()
        );
        Ok(result)
    }

    /// Prerender existing host pages into `output_dir`, keeping their names.
    pub fn render_hosts(
        &self,
        hosts: &[PathBuf],
        output_dir: &Path,
    ) -> Result<BuildResult, BuildError> {
        let mut docs = Vec::with_capacity(hosts.len());
        for host in hosts {
            let file_name =
                host_file_name(host).ok_or_else(|| BuildError::InvalidHostPath(host.clone()))?;
            let html = std::fs::read_to_string(host).map_err(|source| BuildError::ReadHost {
                path: host.clone(),
                source,
            })?;
            docs.push(ProcessingDocument::new(file_name, html));
        }

        let result = self.run(&Pipeline::default_pipeline(), &mut docs, output_dir.to_path_buf())?;
        for doc in &docs {
            println!(
                "Rendered {} ({} question(s), {} outline entries)",
                doc.file_name,
                doc.qa_count,
                doc.outline.len()
            );
        }
        Ok(result)
    }

    fn run(
        &self,
        pipeline: &Pipeline,
        docs: &mut [ProcessingDocument],
        output_dir: PathBuf,
    ) -> Result<BuildResult, BuildError> {
        std::fs::create_dir_all(&output_dir).map_err(|source| BuildError::CreateOutput {
            path: output_dir.clone(),
            source,
        })?;

        let pages = &self.config.pages;
        let sanitizer = MarkdownSanitizer::new(&pages.markdown)?;
        let highlighter = CodeHighlighter::new(&pages.highlight_theme);
        let ctx = PipelineContext::new(&output_dir, pages, &sanitizer, &highlighter);
        pipeline.run(docs, &ctx)?;

        Ok(BuildResult::from_docs(output_dir, docs))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(&self.base_path, path)
    }
}

/// Append a card under its category. Folders arrive sorted by category, so
/// a new category always starts a new section.
fn add_card(categories: &mut Vec<CategoryListing>, category: &str, card: PatternCard) {
    let anchor = format!("category-{}", slugify(category));
    if categories.last().is_none_or(|last| last.anchor != anchor) {
        categories.push(CategoryListing {
            name: category_title(category),
            anchor,
            patterns: Vec::new(),
        });
    }
    if let Some(last) = categories.last_mut() {
        last.patterns.push(card);
    }
}
