//! Diagram source discovery.

use std::path::{Path, PathBuf};

use super::DiagramError;

/// Directories never searched for diagram sources.
const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

/// A diagram source found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    pub path: PathBuf,
    /// Path relative to the discovery root; drives the artifact name
    pub relative: PathBuf,
}

/// Finds files with an exact name sitting directly in a conventional
/// subdirectory, e.g. `<anything>/UML/ClassDiagram.md`.
#[derive(Debug, Clone)]
pub struct DiagramDiscovery {
    root: PathBuf,
    file_name: String,
    subdir: String,
}

impl DiagramDiscovery {
    pub fn new(root: &Path, file_name: &str, subdir: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            file_name: file_name.to_string(),
            subdir: subdir.to_string(),
        }
    }

    /// Walk the root depth-first. Entries are visited in sorted order so
    /// repeated runs see the same sequence.
    pub fn discover(&self) -> Result<Vec<DiagramSource>, DiagramError> {
        if !self.root.is_dir() {
            return Err(DiagramError::RootNotFound(self.root.clone()));
        }
        let mut found = Vec::new();
        self.walk(&self.root, &mut found)?;
        Ok(found)
    }

    fn walk(&self, dir: &Path, found: &mut Vec<DiagramSource>) -> Result<(), DiagramError> {
        let entries = std::fs::read_dir(dir).map_err(|source| DiagramError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DiagramError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            if path.is_dir() {
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                    continue;
                }
                self.walk(&path, found)?;
            } else if path.is_file() && self.matches(&path, &name) {
                let relative = path
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.clone());
                found.push(DiagramSource { path, relative });
            }
        }
        Ok(())
    }

    fn matches(&self, path: &Path, name: &str) -> bool {
        name == self.file_name
            && path
                .parent()
                .and_then(Path::file_name)
                .is_some_and(|parent| parent == self.subdir.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "```mermaid\nclassDiagram\n```\n").unwrap();
    }

    #[test]
    fn test_finds_only_conventional_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "structural/Proxy/UML/ClassDiagram.md");
        touch(root, "behavioral/Observer/UML/ClassDiagram.md");
        touch(root, "behavioral/Observer/ClassDiagram.md");
        touch(root, "behavioral/Observer/UML/Other.md");
        touch(root, "behavioral/Observer/UML/nested/ClassDiagram.md");
        touch(root, "creational/Builder/uml/ClassDiagram.md");
        touch(root, ".hidden/X/UML/ClassDiagram.md");
        touch(root, "node_modules/pkg/UML/ClassDiagram.md");
        touch(root, "target/UML/ClassDiagram.md");

        let found = DiagramDiscovery::new(root, "ClassDiagram.md", "UML")
            .discover()
            .unwrap();
        let relative: Vec<PathBuf> = found.into_iter().map(|s| s.relative).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("behavioral/Observer/UML/ClassDiagram.md"),
                PathBuf::from("structural/Proxy/UML/ClassDiagram.md"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiagramDiscovery::new(&dir.path().join("missing"), "ClassDiagram.md", "UML")
            .discover()
            .unwrap_err();
        assert!(matches!(err, DiagramError::RootNotFound(_)));
    }
}
