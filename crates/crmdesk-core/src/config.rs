//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, where the session is kept, an optional request timeout
//! and the last e-mail used to log in.
//!
//! Configuration is stored at `~/.config/crmdesk/config.json`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{FileSessionStore, KeyringSessionStore, SessionStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "crmdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "CRMDESK_BASE_URL";

/// Where the session is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// `session.json` in the data directory
    #[default]
    File,
    /// OS keychain. On Linux this is the kernel session keyring, which is
    /// emptied at logout and on reboot.
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    #[serde(default)]
    pub session_backend: SessionBackend,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
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

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = Some(url);
            }
        }
        self
    }

    /// API base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
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

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }

    /// Open the configured session store
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        Ok(match self.session_backend {
            SessionBackend::File => Arc::new(FileSessionStore::new(self.data_dir()?)),
            SessionBackend::Keyring => Arc::new(KeyringSessionStore::new()?),
        })
    }
}
