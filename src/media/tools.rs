//! External tool discovery.
//!
//! ffmpeg and ffprobe are resolved once at startup, preferring configured
//! paths over `$PATH` lookup, so a missing installation fails fast with an
//! actionable message instead of mid-session.

use crate::media::MediaError;
use std::path::{Path, PathBuf};

/// Resolved paths to the external media tools.
#[derive(Debug, Clone)]
pub struct MediaTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl MediaTools {
    /// Locate ffmpeg and ffprobe, preferring configured paths over `$PATH`.
    pub fn discover(
        ffmpeg_override: Option<&Path>,
        ffprobe_override: Option<&Path>,
    ) -> Result<Self, MediaError> {
        Ok(Self {
            ffmpeg: tool_path("ffmpeg", ffmpeg_override)?,
            ffprobe: tool_path("ffprobe", ffprobe_override)?,
        })
    }

    /// Path to the ffmpeg binary.
    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    /// Path to the ffprobe binary.
    pub fn ffprobe(&self) -> &Path {
        &self.ffprobe
    }

    /// Tools handle for tests that never spawn a process.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

/// Get the path to a tool, preferring a configured path over `$PATH` lookup.
fn tool_path(name: &str, configured: Option<&Path>) -> Result<PathBuf, MediaError> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    require_tool(name)
}

/// Require that a tool is available, returning its path.
fn require_tool(name: &str) -> Result<PathBuf, MediaError> {
    which::which(name).map_err(|_| MediaError::tool_not_found(name))
}
