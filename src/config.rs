//! Store configuration
//!
//! Options can be built in code or read from a JSON file with camelCase keys,
//! e.g. `{"file": "main.json", "maximize": false, "defaultWidth": 1024}`.
//! Missing keys take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{defaults, paths};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Persisted state filename
    #[serde(default = "default_file")]
    pub file: String,

    /// Directory holding the file (host data directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Restore the maximized flag on manage
    #[serde(default = "default_true")]
    pub maximize: bool,

    /// Restore the full-screen flag on manage
    #[serde(default = "default_true")]
    pub full_screen: bool,

    /// Width used when no valid state exists (0 means unset)
    #[serde(default = "default_width")]
    pub default_width: u32,

    /// Height used when no valid state exists (0 means unset)
    #[serde(default = "default_height")]
    pub default_height: u32,
}

fn default_file() -> String {
    defaults::FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    defaults::WIDTH
}

fn default_height() -> u32 {
    defaults::HEIGHT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            path: None,
            maximize: true,
            full_screen: true,
            default_width: defaults::WIDTH,
            default_height: defaults::HEIGHT,
        }
    }
}

impl StoreConfig {
    /// Load options from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: StoreConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
        info!(path = %path.display(), file = %config.file, "Loaded store config");
        Ok(config)
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_default_size(mut self, width: u32, height: u32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Fallback size, with 0 treated as unset
    pub fn effective_default_size(&self) -> (u32, u32) {
        let width = if self.default_width == 0 { defaults::WIDTH } else { self.default_width };
        let height = if self.default_height == 0 { defaults::HEIGHT } else { self.default_height };
        (width, height)
    }

    /// Full path of the state file, using `data_dir` when no path is configured
    pub fn file_path(&self, data_dir: impl FnOnce() -> PathBuf) -> PathBuf {
        let dir = self.path.clone().unwrap_or_else(data_dir);
        dir.join(&self.file)
    }
}

/// Per-user data directory used when the host has no better answer
pub fn default_user_data_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(paths::APP_DIR);
    path
}
