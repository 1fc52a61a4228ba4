use std::path::{Path, PathBuf};

use crate::diagrams::extract::extract_diagram;
use crate::diagrams::output::find_artifact;
use crate::util::{spaced_name, strip_interview_suffix};

use super::paths::{artifact_href, page_file_name};
use super::render::UmlSection;

/// Files a pattern page's markdown is taken from, in order of preference.
const TITLE_SOURCES: [&str; 2] = ["PatternReference.md", "README.md"];

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("pattern root does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("pattern root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Pattern root
// =============================================================================

/// A validated directory laid out as `<root>/<category>/<pattern>`.
#[derive(Debug, Clone)]
pub struct PatternRoot {
    pub path: PathBuf,
}

impl PatternRoot {
    pub fn resolve(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(SourceError::NotADirectory(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// All pattern folders, sorted by category then pattern name.
    pub fn discover(&self) -> Result<Vec<PatternFolder>, SourceError> {
        let mut folders = Vec::new();
        for category in sorted_subdirs(&self.path)? {
            for pattern in sorted_subdirs(&category)? {
                folders.push(PatternFolder { path: pattern });
            }
        }
        Ok(folders)
    }
}

/// Visible subdirectories of `dir`, sorted by name.
fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SourceError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SourceError::ReadEntry {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() && !entry.file_name().to_string_lossy().starts_with('.') {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

// =============================================================================
// Pattern folder
// =============================================================================

/// One design pattern's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFolder {
    pub path: PathBuf,
}

/// Everything needed to render a pattern's host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPage {
    pub title: String,
    /// First line of prose, shown on the index card
    pub summary: String,
    pub markdown: String,
    pub file_name: String,
}

impl PatternFolder {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the category directory the folder sits in.
    pub fn category(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read the folder's title and markdown.
    ///
    /// The first candidate file with a non-empty line wins; its first line
    /// (without leading `#`) is the title and its whole text the markdown.
    /// Without one, the folder name is the title and the markdown is empty.
    pub fn load(&self) -> Result<PatternPage, SourceError> {
        let name = self.name();
        let file_name = page_file_name(&name);

        for candidate in TITLE_SOURCES {
            let path = self.path.join(candidate);
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|e| SourceError::ReadFile {
                path: path.clone(),
                source: e,
            })?;
            let title = text
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(|line| strip_interview_suffix(line.trim_start_matches('#').trim()));
            if let Some(title) = title {
                return Ok(PatternPage {
                    title,
                    summary: summary_line(&text),
                    markdown: text,
                    file_name,
                });
            }
        }

        Ok(PatternPage {
            title: strip_interview_suffix(&spaced_name(&name)),
            summary: String::new(),
            markdown: String::new(),
            file_name,
        })
    }

    /// The class diagram section for this pattern's page.
    ///
    /// A rendered artifact in the artifact directory is linked when present (vector
    /// before raster); otherwise the diagram source is embedded for the
    /// in-page engine. `None` when the folder has no diagram.
    pub fn uml_section(&self, layout: &DiagramLayout) -> Result<Option<UmlSection>, SourceError> {
        let source_path = self.path.join(&layout.subdir).join(&layout.file_name);
        if !source_path.is_file() {
            return Ok(None);
        }

        if let Ok(relative) = source_path.strip_prefix(&layout.diagram_root)
            && let Some((name, _)) = find_artifact(&layout.artifact_dir, relative)
        {
            return Ok(Some(UmlSection {
                image: Some(artifact_href(&layout.page_dir, &layout.artifact_dir, &name)),
                source: None,
            }));
        }

        let text = std::fs::read_to_string(&source_path).map_err(|e| SourceError::ReadFile {
            path: source_path.clone(),
            source: e,
        })?;
        Ok(extract_diagram(&text).map(|block| UmlSection {
            image: None,
            source: Some(block.trim().to_string()),
        }))
    }
}

/// First line of prose in a markdown document, skipping headings and
/// fenced code.
fn summary_line(markdown: &str) -> String {
    let mut in_fence = false;
    for line in markdown.lines().map(str::trim) {
        if line.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.is_empty() || line.starts_with('#') {
            continue;
        }
        return strip_interview_suffix(line);
    }
    String::new()
}

/// Readable category name: "creational" -> "Creational".
pub fn category_title(category: &str) -> String {
    let spaced = spaced_name(category);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where diagram sources live and where their artifacts were written.
#[derive(Debug, Clone)]
pub struct DiagramLayout {
    /// Root the artifact names were derived from
    pub diagram_root: PathBuf,
    /// Directory holding rendered artifacts
    pub artifact_dir: PathBuf,
    /// Directory the pages are written to; links are relative to it
    pub page_dir: PathBuf,
    pub subdir: String,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn layout(root: &Path) -> DiagramLayout {
        DiagramLayout {
            diagram_root: root.join("patterns"),
            artifact_dir: root.join("build/diagrams"),
            page_dir: root.to_path_buf(),
            subdir: "UML".to_string(),
            file_name: "ClassDiagram.md".to_string(),
        }
    }

    #[test]
    fn test_discovers_second_level_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "structural/Proxy/README.md", "# Proxy");
        write(root, "behavioral/Observer/README.md", "# Observer");
        write(root, "behavioral/Command/README.md", "# Command");
        write(root, "behavioral/notes.md", "not a pattern");
        write(root, ".git/objects/x", "");

        let folders = PatternRoot::resolve(root).unwrap().discover().unwrap();
        let names: Vec<String> = folders.iter().map(PatternFolder::name).collect();
        assert_eq!(names, vec!["Command", "Observer", "Proxy"]);
    }

    #[test]
    fn test_resolve_rejects_missing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PatternRoot::resolve(&dir.path().join("missing")),
            Err(SourceError::PathNotFound(_))
        ));
        write(dir.path(), "file.md", "");
        assert!(matches!(
            PatternRoot::resolve(&dir.path().join("file.md")),
            Err(SourceError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_title_prefers_pattern_reference() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Proxy/PatternReference.md",
            "\n# Proxy Pattern — Interview Reference\n\nBody",
        );
        write(dir.path(), "Proxy/README.md", "# Proxy readme");

        let page = PatternFolder {
            path: dir.path().join("Proxy"),
        }
        .load()
        .unwrap();
        assert_eq!(page.title, "Proxy Pattern");
        assert_eq!(page.summary, "Body");
        assert!(page.markdown.contains("Body"));
        assert_eq!(page.file_name, "All_Design_Patterns_proxy.html");
    }

    #[test]
    fn test_title_falls_back_to_readme_then_folder() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Chain_of-Responsibility/PatternReference.md", "   \n\n");
        write(dir.path(), "Chain_of-Responsibility/README.md", "Plain first line\nmore");

        let folder = PatternFolder {
            path: dir.path().join("Chain_of-Responsibility"),
        };
        assert_eq!(folder.load().unwrap().title, "Plain first line");

        std::fs::remove_file(dir.path().join("Chain_of-Responsibility/README.md")).unwrap();
        let page = folder.load().unwrap();
        assert_eq!(page.title, "Chain of Responsibility");
        assert_eq!(page.markdown, "");
        assert_eq!(
            page.file_name,
            "All_Design_Patterns_chain-of-responsibility.html"
        );
    }

    #[test]
    fn test_category_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "creational/Builder/README.md",
            "# Builder\n\n## Intent\n\n```java\nclass B {}\n```\nSeparate construction from representation.\n",
        );
        let folder = PatternFolder {
            path: dir.path().join("creational/Builder"),
        };
        assert_eq!(folder.category(), "creational");
        assert_eq!(
            folder.load().unwrap().summary,
            "Separate construction from representation."
        );

        assert_eq!(category_title("creational"), "Creational");
        assert_eq!(category_title("object_pool"), "Object pool");
        assert_eq!(category_title(""), "");
    }

    #[test]
    fn test_uml_section_embeds_source_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "patterns/structural/Proxy/UML/ClassDiagram.md",
            "```mermaid\nclassDiagram\n  Proxy --> Subject\n```\n",
        );
        let folder = PatternFolder {
            path: dir.path().join("patterns/structural/Proxy"),
        };

        assert_eq!(
            folder.uml_section(&layout(dir.path())).unwrap(),
            Some(UmlSection {
                image: None,
                source: Some("classDiagram\n  Proxy --> Subject".to_string()),
            })
        );
    }

    #[test]
    fn test_uml_section_links_rendered_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "patterns/structural/Proxy/UML/ClassDiagram.md",
            "```mermaid\nclassDiagram\n```\n",
        );
        write(
            dir.path(),
            "build/diagrams/structural_Proxy_UML_ClassDiagram.md.png",
            "png",
        );
        let folder = PatternFolder {
            path: dir.path().join("patterns/structural/Proxy"),
        };

        let section = folder.uml_section(&layout(dir.path())).unwrap().unwrap();
        assert_eq!(
            section.image.as_deref(),
            Some("build/diagrams/structural_Proxy_UML_ClassDiagram.md.png")
        );

        write(
            dir.path(),
            "build/diagrams/structural_Proxy_UML_ClassDiagram.md.svg",
            "<svg/>",
        );
        let section = folder.uml_section(&layout(dir.path())).unwrap().unwrap();
        assert_eq!(
            section.image.as_deref(),
            Some("build/diagrams/structural_Proxy_UML_ClassDiagram.md.svg")
        );
    }

    #[test]
    fn test_no_uml_section_without_diagram() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "patterns/x/Plain/README.md", "# Plain");
        let folder = PatternFolder {
            path: dir.path().join("patterns/x/Plain"),
        };
        assert_eq!(folder.uml_section(&layout(dir.path())).unwrap(), None);
    }
}
