//! Configuration loading from files and the environment.
//!
//! The YAML file is optional; every key has a default. Environment variables
//! prefixed with `PATTERNBOOK__` override file values.

use std::path::Path;

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE, ENV_PREFIX};

impl Config {
    /// Load the config from the command line argument, defaulting to `patternbook.yaml`
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file)
    }

    /// Load the config from a file path, layering environment overrides on top
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        }

        let settings = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Isolation;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_file(&dir.path().join("patternbook.yaml")).unwrap();
        assert_eq!(config.diagrams.file_name, "ClassDiagram.md");
        assert_eq!(config.diagrams.isolation, Isolation::PerJob);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patternbook.yaml");
        std::fs::write(
            &path,
            "pages:\n  marker_heading: FAQ\ndiagrams:\n  isolation: shared\n  settle_max_ms: 5000\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.pages.marker_heading, "FAQ");
        assert_eq!(config.pages.scroll_threshold, 100.0);
        assert_eq!(config.diagrams.isolation, Isolation::Shared);
        assert_eq!(config.diagrams.settle_max_ms, 5000);
        assert_eq!(config.diagrams.subdir, "UML");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patternbook.yaml");
        std::fs::write(&path, "diagrams:\n  navigation_timeout_ms: 0\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("navigation_timeout_ms"));
    }
}
