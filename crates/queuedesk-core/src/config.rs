//! Application configuration management.
//!
//! Configuration comes from `~/.config/queuedesk/config.json` and is
//! overridden by the environment:
//!
//! - `QUEUEDESK_API_URL`: backend base URL
//! - `QUEUEDESK_HOSPITAL_ID`: hospital the departments belong to
//!
//! A missing base URL is logged but never blocks startup; requests then
//! target an empty base and fail at the transport layer.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "queuedesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the cache dir holding the persisted session slots
const SESSION_DIR: &str = "session";

pub const ENV_API_URL: &str = "QUEUEDESK_API_URL";
pub const ENV_HOSPITAL_ID: &str = "QUEUEDESK_HOSPITAL_ID";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub hospital_id: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
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

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(hospital) = non_empty(ENV_HOSPITAL_ID) {
            self.hospital_id = Some(hospital);
        }
    }

    /// Log the settings that are absent once all overrides are applied.
    pub fn warn_missing(&self) {
        if self.api_url.is_none() {
            warn!("{} is not set", ENV_API_URL);
        }
        if self.hospital_id.is_none() {
            warn!("{} is not set; department queries are unscoped", ENV_HOSPITAL_ID);
        }
    }

    /// Backend base URL with any trailing slash removed. Empty when unset.
    pub fn base_url(&self) -> String {
        self.api_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session slots.
    pub fn session_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(SESSION_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            api_url: Some("http://file".to_string()),
            hospital_id: Some("h-file".to_string()),
            last_email: None,
        };
        config.apply_env(|key| match key {
            ENV_API_URL => Some("http://env:4000/api/".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url.as_deref(), Some("http://env:4000/api/"));
        assert_eq!(config.hospital_id.as_deref(), Some("h-file"));
        assert_eq!(config.base_url(), "http://env:4000/api");
    }

    #[test]
    fn test_empty_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("   ".to_string()));
        assert!(config.api_url.is_none());
        assert!(config.hospital_id.is_none());
    }

    #[test]
    fn test_base_url_missing_is_empty() {
        assert_eq!(Config::default().base_url(), "");
    }
}
