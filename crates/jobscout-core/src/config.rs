use std::path::{Path, PathBuf};
use std::time::Duration;

use jobscout_api::{RemotiveClient, REMOTIVE_API_BASE};
use serde::{Deserialize, Serialize};

use crate::DetailLookup;

/// Main configuration structure
///
/// Loaded from `config.toml` in the platform config dir. CLI flags and env
/// vars are applied on top by the binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// `<config_dir>/jobscout/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("jobscout")
            .join("config.toml"))
    }

    /// Remotive client built from the `[api]` section
    pub fn build_client(&self) -> crate::Result<RemotiveClient> {
        let timeout = self.api.timeout_secs.map(Duration::from_secs);
        Ok(RemotiveClient::with_options(&self.api.base_url, timeout)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub detail_lookup: DetailLookup,
}

fn default_base_url() -> String {
    REMOTIVE_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            detail_lookup: DetailLookup::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// SQLite file holding favorites; defaults to the platform data dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, else `<data_dir>/jobscout/storage.db`
    pub fn resolved_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        Ok(dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("jobscout")
            .join("storage.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How often the TUI redraws while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}
