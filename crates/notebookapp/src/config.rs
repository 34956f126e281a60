//! # Configuration
//!
//! Notebook configuration is managed by [`confique`], layered in priority
//! order:
//!
//! 1. **Environment variables**: `NOTEBOOK_DATA_DIR`, `NOTEBOOK_AUTOSAVE_DELAY_MS`,
//!    `NOTEBOOK_LOG_LEVEL`.
//! 2. **Config file**: `notebook.toml` inside the data directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! A data directory passed explicitly (e.g. `--data-dir`) beats all of them.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Root that holds `documents/` |
//! | `autosave_delay_ms` | `1000` | Quiet period before an autosave fires |
//! | `log_level` | `warn` | Default tracing filter |

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::error::{NotebookError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "notebook.toml";
pub const DATA_DIR_ENV: &str = "NOTEBOOK_DATA_DIR";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Root directory for stored documents.
    #[config(env = "NOTEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Milliseconds of editor quiet before an autosave is written.
    #[config(env = "NOTEBOOK_AUTOSAVE_DELAY_MS", default = 1000)]
    pub autosave_delay_ms: u64,

    /// Default log filter, e.g. "warn" or "notebookapp=debug".
    #[config(env = "NOTEBOOK_LOG_LEVEL", default = "warn")]
    pub log_level: String,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
            log_level: "warn".to_string(),
        }
    }
}

/// OS-appropriate data directory, or `./.notebook` when none is known.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "notebook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".notebook"))
}

impl NotebookConfig {
    /// Load configuration, reading `notebook.toml` from the data directory
    /// that the explicit argument, the environment, or the OS default names.
    pub fn load(explicit_data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = explicit_data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let mut config = Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()
            .map_err(|err| NotebookError::Config(err.to_string()))?;

        if explicit_data_dir.is_some() || config.data_dir.is_none() {
            config.data_dir = Some(data_dir);
        }
        Ok(config)
    }

    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
