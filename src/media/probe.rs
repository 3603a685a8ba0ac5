//! FFprobe-based video probing.

use crate::media::{MediaError, MediaTools};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// What playback needs to know about a video file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Total duration in seconds.
    pub duration: f64,
    /// Native frame rate in frames per second.
    pub fps: f64,
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file using ffprobe.
pub fn probe_video(tools: &MediaTools, path: &Path) -> Result<VideoInfo, MediaError> {
    let output = Command::new(tools.ffprobe())
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::tool_not_found("ffprobe")
            } else {
                MediaError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::tool_failed("ffprobe", stderr.to_string()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| MediaError::parse("ffprobe", format!("invalid UTF-8: {}", e)))?;

    parse_probe_json(path, &json_str)
}

fn parse_probe_json(path: &Path, json_str: &str) -> Result<VideoInfo, MediaError> {
    let ff: FfprobeOutput = serde_json::from_str(json_str)?;

    let video = ff
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::NoVideoStream {
            path: path.display().to_string(),
        })?;

    let width = video
        .width
        .ok_or_else(|| MediaError::parse("ffprobe", "video stream missing width"))?;
    let height = video
        .height
        .ok_or_else(|| MediaError::parse("ffprobe", "video stream missing height"))?;

    // avg_frame_rate reflects actual content; r_frame_rate is the fallback
    // for files where ffprobe reports avg as 0/0.
    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .filter(|f| f.is_finite() && *f > 0.0)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .filter(|f| f.is_finite() && *f > 0.0)
        .ok_or_else(|| MediaError::parse("ffprobe", "no usable frame rate"))?;

    let duration = ff
        .format
        .duration
        .as_deref()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| MediaError::parse("ffprobe", "no usable duration"))?;

    Ok(VideoInfo {
        duration,
        fps,
        width,
        height,
    })
}

fn parse_frame_rate(rate_str: &str) -> Option<f64> {
    let parts: Vec<&str> = rate_str.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate_str.parse().ok()
}
