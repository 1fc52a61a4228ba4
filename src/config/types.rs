//! Configuration type definitions.
//!
//! This module contains all the data structures used in patternbook.yaml.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Top-level config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pattern page rendering
    #[serde(default)]
    pub pages: PagesConfig,
    /// Diagram batch rendering
    #[serde(default)]
    pub diagrams: DiagramsConfig,
}

// =============================================================================
// Pattern pages
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory holding `<category>/<pattern>` folders
    pub root: PathBuf,
    /// Where generated pages are written
    pub output: PathBuf,
    /// Where rendered diagram artifacts are looked up for the UML section
    pub diagram_dir: PathBuf,
    /// Custom page template (Tera); the bundled one is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Stylesheets linked from every page
    pub stylesheets: Vec<String>,
    /// Heading the Q&A section is placed after
    pub marker_heading: String,
    /// Viewport offset (px) at which a heading becomes the active outline entry
    pub scroll_threshold: f64,
    /// Syntax highlighting theme
    pub highlight_theme: String,
    pub markdown: MarkdownConfig,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("LLD/DesignPattern"),
            output: PathBuf::from("."),
            diagram_dir: PathBuf::from("build/diagrams"),
            template: None,
            stylesheets: vec![
                "tools/index_style.css".to_string(),
                "tools/pattern_page.css".to_string(),
                "tools/pattern_layout.css".to_string(),
            ],
            marker_heading: "Common Interview Questions".to_string(),
            scroll_threshold: 100.0,
            highlight_theme: "github-dark".to_string(),
            markdown: MarkdownConfig::default(),
        }
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "gfm".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}

// =============================================================================
// Diagram batch
// =============================================================================

/// How rendering contexts are handed out to diagram jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Isolation {
    /// A fresh context per job, closed when the job ends
    #[default]
    PerJob,
    /// One context reused by every job
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Directory tree searched for diagram sources
    pub root: PathBuf,
    /// Where artifacts are written
    pub output: PathBuf,
    /// Exact file name of a diagram source
    pub file_name: String,
    /// Directory a diagram source must sit in
    pub subdir: String,
    /// Script URL of the diagram engine
    pub engine_url: String,
    /// Upper bound for loading one host document
    pub navigation_timeout_ms: u64,
    /// Interval between checks of the rendered markup
    pub settle_poll_ms: u64,
    /// Upper bound for waiting on the rendered markup
    pub settle_max_ms: u64,
    pub isolation: Isolation,
    /// Browser binary; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_executable: Option<PathBuf>,
    /// Clean up diagram sources before rendering
    pub clean_source: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("LLD/DesignPattern"),
            output: PathBuf::from("build/diagrams"),
            file_name: "ClassDiagram.md".to_string(),
            subdir: "UML".to_string(),
            engine_url: "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js".to_string(),
            navigation_timeout_ms: 120_000,
            settle_poll_ms: 250,
            settle_max_ms: 2_000,
            isolation: Isolation::PerJob,
            chrome_executable: None,
            clean_source: true,
        }
    }
}
