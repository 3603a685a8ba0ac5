//! Configuration file handling.
//!
//! Reads an optional TOML config from the platform config directory
//! (`~/.config/stepplay/config.toml` on Linux). Every field has a default,
//! so a missing file or missing keys never block startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration.
///
/// All fields are optional overrides; resolution methods fall back to
/// platform defaults or `$PATH` lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for persistent state (the step database). Defaults to the
    /// platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Explicit path to the ffmpeg binary. Defaults to `$PATH` lookup.
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit path to the ffprobe binary. Defaults to `$PATH` lookup.
    pub ffprobe_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields `Config::default()`; a malformed file is an
    /// error.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("stepplay").join("config.toml"))
    }

    /// Resolve the state directory, honoring the `data_dir` override.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir().context("could not determine data directory")?;
        Ok(base.join("stepplay"))
    }

    /// Path to the step database inside the state directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("steps.db"))
    }
}
