//! CLI command implementations.

pub mod config;
pub mod extract;
pub mod show;
pub mod update;

use std::path::{Path, PathBuf};

use ratescan_core::ScanConfig;

/// Default config location: `<config dir>/ratescan/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ratescan")
        .join("config.json")
}

/// Load the config from an explicit path, the default location, or fall
/// back to defaults when no file exists.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    if let Some(path) = config_path {
        return Ok(ScanConfig::from_file(Path::new(path))?);
    }
    let default_path = default_config_path();
    if default_path.exists() {
        return Ok(ScanConfig::from_file(&default_path)?);
    }
    Ok(ScanConfig::default())
}
