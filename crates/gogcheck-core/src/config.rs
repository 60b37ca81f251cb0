//! Endpoint and default-choice configuration from `~/.config/gogcheck/config.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration. Endpoint bases are configurable so mirrors and test
/// servers can stand in for the real content system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GogcheckConfig {
    /// Base URL of the builds-listing service.
    pub content_system_base: String,
    /// Base URL of the CDN serving depot listings.
    pub cdn_base: String,
    /// Platform assumed when `--os` is not given ("windows" or "osx").
    pub default_os: String,
    /// Language filter assumed when `--language` is not given.
    pub default_language: String,
}

impl Default for GogcheckConfig {
    fn default() -> Self {
        Self {
            content_system_base: "https://content-system.gog.com".to_string(),
            cdn_base: "https://cdn.gog.com".to_string(),
            default_os: "windows".to_string(),
            default_language: "en-US".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gogcheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GogcheckConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GogcheckConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: GogcheckConfig = toml::from_str(&data)?;
    Ok(cfg)
}
