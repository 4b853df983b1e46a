//! Standard paths used by the browser

use std::path::{Path, PathBuf};

const APP_DIR: &str = "infisical-browser";

/// Standard browser paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory (~/.local/share/infisical-browser)
    pub data: PathBuf,
    /// Config directory (~/.config/infisical-browser)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join(APP_DIR);

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self { data, config }
    }

    /// Place both directories under a single root (used by tests and `--home`)
    pub fn under(root: &Path) -> Self {
        Self {
            data: root.join("data"),
            config: root.join("config"),
        }
    }

    /// JSON configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Credentials written by `browse init`
    pub fn env_file(&self) -> PathBuf {
        self.config.join(".env")
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_file(&self) -> PathBuf {
        self.data.join("browse.log")
    }
}
