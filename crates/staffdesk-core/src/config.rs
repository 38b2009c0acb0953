//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, where credentials are kept, the request timeout and the
//! last email used to log in.
//!
//! Configuration is stored at `~/.config/staffdesk/config.json`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::transport::DEFAULT_TIMEOUT_SECS;
use crate::auth::{CredentialStorage, FileStorage, KeyringStorage, MemoryStorage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "staffdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "STAFFDESK_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Where session credentials are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// OS keychain
    #[default]
    Keyring,
    /// JSON file in the cache directory
    File,
    /// Process memory only
    Memory,
}

impl StorageBackend {
    pub fn open(&self, cache_dir: &Path) -> Arc<dyn CredentialStorage> {
        match self {
            StorageBackend::Keyring => Arc::new(KeyringStorage::new()),
            StorageBackend::File => Arc::new(FileStorage::in_dir(cache_dir)),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(StorageBackend::Keyring),
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown storage backend '{}' (expected keyring, file or memory)",
                other
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Keyring => "keyring",
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    pub timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL from the environment, then the config file, then the default.
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(BASE_URL_ENV).ok(), self.base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
