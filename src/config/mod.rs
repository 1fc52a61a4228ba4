//! Configuration loading and types for patternbook.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

use std::path::{Path, PathBuf};

// Re-export all types for convenient access
pub use types::{Config, DiagramsConfig, Isolation, MarkdownConfig, PagesConfig};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "patternbook.yaml";

/// Prefix of environment variables overriding config keys,
/// e.g. `PATTERNBOOK__DIAGRAMS__ISOLATION=shared`.
pub const ENV_PREFIX: &str = "PATTERNBOOK";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

impl Config {
    /// Check value ranges the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pages = &self.pages;
        if !pages.scroll_threshold.is_finite() || pages.scroll_threshold < 0.0 {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'pages.scroll_threshold' must be a non-negative number, got {}",
                pages.scroll_threshold
            )));
        }
        if pages.marker_heading.trim().is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'pages.marker_heading' must not be empty".to_string(),
            ));
        }

        let diagrams = &self.diagrams;
        if diagrams.file_name.is_empty() || diagrams.subdir.is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'diagrams.file_name' and 'diagrams.subdir' must not be empty"
                    .to_string(),
            ));
        }
        if diagrams.navigation_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "invalid config: 'diagrams.navigation_timeout_ms' must be greater than zero"
                    .to_string(),
            ));
        }
        if diagrams.settle_poll_ms == 0 || diagrams.settle_max_ms < diagrams.settle_poll_ms {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'diagrams.settle_poll_ms' ({}) must be positive and not exceed 'diagrams.settle_max_ms' ({})",
                diagrams.settle_poll_ms, diagrams.settle_max_ms
            )));
        }

        Ok(())
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve a configured path against the config file's directory.
pub fn resolve_path(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}
