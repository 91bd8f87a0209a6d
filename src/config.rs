//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL and last used email address.
//!
//! Configuration is stored at `~/.config/emtct-tui/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "emtct-tui";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
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

    /// Directory holding the session file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL for API requests. The EMTCT_API_URL environment variable
    /// takes precedence over the config file.
    pub fn base_url(&self) -> Option<String> {
        std::env::var("EMTCT_API_URL")
            .ok()
            .or_else(|| self.api_base_url.clone())
    }
}
