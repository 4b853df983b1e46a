//! Configuration management for the browser

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Config-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A deployment of the remote service with its own API base URL.
///
/// Authentication and secret listing are both derived from `base_url`, so a
/// client that authenticated against a region always fetches from it too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Short label used in logs and errors (e.g. "us")
    pub name: String,
    /// API root, e.g. "https://us.infisical.com/api"
    pub base_url: String,
}

impl Region {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// Universal auth login endpoint
    pub fn auth_url(&self) -> String {
        format!("{}/v1/auth/universal-auth/login", self.base())
    }

    /// Raw secrets listing endpoint
    pub fn secrets_url(&self) -> String {
        format!("{}/v3/secrets/raw", self.base())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Regions in the order they are tried during authentication
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,

    /// Web app used for "open in Infisical" links
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Start the UI with secret values hidden
    #[serde(default)]
    pub mask_values: bool,
}

fn default_regions() -> Vec<Region> {
    vec![
        Region::new("us", "https://us.infisical.com/api"),
        Region::new("app", "https://app.infisical.com/api"),
    ]
}

fn default_app_url() -> String {
    "https://app.infisical.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            app_url: default_app_url(),
            mask_values: false,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::Invalid("at least one region is required".to_string()));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' has an empty base_url",
                    region.name
                )));
            }
            if !seen.insert(region.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' is listed twice",
                    region.name
                )));
            }
        }

        Ok(())
    }
}
