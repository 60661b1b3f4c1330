use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use quizsolver_core_types::Settings;

pub const API_KEY_ENV: &str = "QUIZSOLVER_API_KEY";

/// On-disk configuration, JSON under the platform config directory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub store_path: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("quizsolver");
    path.push("config.json");
    Some(path)
}

pub fn default_store_path() -> Result<PathBuf> {
    let mut path = dirs::data_dir().context("failed to resolve data directory")?;
    path.push("quizsolver");
    path.push("store.json");
    Ok(path)
}

/// Load configuration. An explicitly given path must exist and parse;
/// a missing default file falls back to defaults.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => {
                warn!("no config directory available, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            info!("loaded configuration from {}", path.display());
            Ok(config)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            Ok(AppConfig::default())
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to read config file {}", path.display()))
        }
    }
}

/// Key precedence: stored settings override the environment, which
/// overrides the config file. Empty strings do not count.
pub fn resolve_api_key(settings: &Settings, config: &AppConfig) -> Option<String> {
    settings
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
        .or_else(|| config.api_key.clone().filter(|key| !key.is_empty()))
}

pub fn resolve_store_path(config: &AppConfig) -> Result<PathBuf> {
    match &config.store_path {
        Some(path) => Ok(path.clone()),
        None => default_store_path(),
    }
}
