use std::path::{Path, PathBuf};

use crate::config::{Config, DEFAULT_CONFIG_FILE, base_path_from_config};

pub mod diagrams;
pub mod init;
pub mod pages;
pub mod render;
pub mod tidy;

/// Load the config named on the command line, returning it with the
/// directory its relative paths resolve against.
fn load_config(config_file: Option<&Path>) -> Result<(Config, PathBuf), anyhow::Error> {
    let config_path = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let config_path = if config_path.is_relative() {
        std::env::current_dir()?.join(config_path)
    } else {
        config_path.to_path_buf()
    };

    let config = Config::load_from_arg(Some(config_path.as_path()))?;
    let base_path = base_path_from_config(&config_path);
    tracing::debug!(config = %config_path.display(), base = %base_path.display(), "Loaded configuration");

    Ok((config, base_path))
}
