//! Artifact naming and writing.
//!
//! Every diagram source maps to exactly one artifact name derived from its
//! path relative to the diagram root. The encoding is injective: path
//! components are joined with `_`, characters in `[A-Za-z0-9.-]` are kept,
//! and every other byte (including `_` and `~`) is written as `~XX`.
//!
//! ```text
//! StructuralDesign/ProxyPattern/UML/ClassDiagram.md
//!   -> StructuralDesign_ProxyPattern_UML_ClassDiagram.md.svg
//! creational/Factory_Method/UML/ClassDiagram.md
//!   -> creational_Factory~5FMethod_UML_ClassDiagram.md.svg
//! ```

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Svg,
    Png,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Svg => "svg",
            ArtifactKind::Png => "png",
        }
    }
}

/// A rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Vector markup read back from the page
    Svg(String),
    /// Screenshot of the diagram container
    Png(Vec<u8>),
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Svg(_) => ArtifactKind::Svg,
            Artifact::Png(_) => ArtifactKind::Png,
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Artifact::Svg(markup) => markup.as_bytes(),
            Artifact::Png(data) => data,
        }
    }
}

/// Encode a relative source path as a flat, filesystem-safe stem.
pub fn artifact_stem(relative: &Path) -> String {
    let mut stem = String::new();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        if !stem.is_empty() {
            stem.push('_');
        }
        for &byte in part.as_encoded_bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'-' {
                stem.push(byte as char);
            } else {
                let _ = write!(stem, "~{byte:02X}");
            }
        }
    }
    stem
}

/// Artifact file name for a relative source path.
pub fn artifact_file_name(relative: &Path, kind: ArtifactKind) -> String {
    format!("{}.{}", artifact_stem(relative), kind.extension())
}

/// Writes artifacts into one flat output directory.
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Create the writer, creating the output directory if absent.
    pub fn create(dir: &Path) -> Result<Self, OutputError> {
        std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an artifact, overwriting any previous one.
    pub fn write(&self, relative: &Path, artifact: &Artifact) -> Result<PathBuf, OutputError> {
        let path = self.dir.join(artifact_file_name(relative, artifact.kind()));
        std::fs::write(&path, artifact.bytes()).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// The artifact already rendered for a source, preferring vector output.
pub fn find_artifact(dir: &Path, relative: &Path) -> Option<(String, ArtifactKind)> {
    [ArtifactKind::Svg, ArtifactKind::Png]
        .into_iter()
        .map(|kind| (artifact_file_name(relative, kind), kind))
        .find(|(name, _)| dir.join(name).is_file())
}
