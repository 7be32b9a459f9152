//! Subcommands.

pub mod config;
pub mod extract;
pub mod text;

use std::path::{Path, PathBuf};

use tracing::debug;

use agv_core::AgvConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agv")
        .join("config.json")
}

/// The file `--config` points at, or the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, else the default file if present,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AgvConfig> {
    let config = match config_path {
        Some(path) => AgvConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading config from {}", path.display());
                AgvConfig::from_file(&path)?
            } else {
                AgvConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
