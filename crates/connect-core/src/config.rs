//! Connector configuration.
//!
//! Loaded from YAML, e.g.:
//!
//! ```yaml
//! enable_local_storage: true
//! default_provider: LeatherProvider
//! approved_providers:
//!   - LeatherProvider
//!   - XverseProviders.BitcoinProvider
//! app_details:
//!   name: My App
//!   icon: https://example.com/icon.png
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Application name and icon shown by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetails {
    pub name: String,
    pub icon: String,
}

/// Connector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Persist normalized addresses after address requests.
    #[serde(default = "default_true")]
    pub enable_local_storage: bool,
    /// Provider used when none has been selected.
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Provider IDs the application accepts (empty = all).
    #[serde(default)]
    pub approved_providers: Vec<String>,
    /// Directory for file-backed storage.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub app_details: Option<AppDetails>,
}

fn default_true() -> bool {
    true
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            enable_local_storage: true,
            default_provider: None,
            approved_providers: Vec::new(),
            storage_dir: None,
            app_details: None,
        }
    }
}

impl ConnectConfig {
    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Whether `provider_id` passes the approved list.
    pub fn is_approved(&self, provider_id: &str) -> bool {
        self.approved_providers.is_empty()
            || self.approved_providers.iter().any(|id| id == provider_id)
    }
}
