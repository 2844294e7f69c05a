//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the API base URL and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/buscafarm/config.json`; session
//! storage lives under the platform data directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE_URL;

/// Application name used for config/data directory paths
const APP_NAME: &str = "buscafarm";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "BUSCAFARM_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL to use: explicit override, then `BUSCAFARM_API_URL`, then the
    /// config file, then the built-in default.
    pub fn api_base_url(&self, explicit: Option<&str>) -> String {
        let from_env = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());
        Self::resolve_base_url(explicit, from_env.as_deref(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(explicit: Option<&str>, env: Option<&str>, configured: Option<&str>) -> String {
        explicit
            .or(env)
            .or(configured)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }
}
