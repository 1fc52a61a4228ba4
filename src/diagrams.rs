//! Batch rendering of UML diagram sources into image artifacts.

pub mod batch;
pub mod chromium;
pub mod discovery;
pub mod extract;
pub mod output;
pub mod session;

use std::path::PathBuf;

pub use batch::{BatchReport, DiagramBatch};
pub use chromium::ChromiumEngine;
pub use discovery::{DiagramDiscovery, DiagramSource};
pub use output::OutputWriter;

#[derive(thiserror::Error, Debug)]
pub enum DiagramError {
    #[error("diagram root does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Output(#[from] output::OutputError),

    #[error(transparent)]
    Session(#[from] session::SessionError),
}

/// One diagram to render. Jobs share no state with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramJob {
    pub source_path: PathBuf,
    pub relative: PathBuf,
    pub diagram_source: String,
}
