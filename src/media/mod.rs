//! Media access via external ffmpeg/ffprobe subprocesses.
//!
//! Nothing in here decodes video itself: ffprobe answers what a file
//! contains, ffmpeg turns it into raw RGB frames and PCM audio. This module
//! owns the subprocess plumbing and exposes the rest of the crate two seams:
//!
//! - [`ClipSource`]: a bounded, decodable view of a video (the production
//!   implementation is [`VideoClip`])
//! - [`AudioOutput`]: a playback sink for the extracted audio (the
//!   production implementation is [`RodioAudio`])
//!
//! The playback engine only ever talks to the seams, so tests drive it with
//! scripted stand-ins instead of spawning ffmpeg.

mod audio;
mod clip;
mod frames;
mod probe;
mod tools;

pub use audio::{AudioOutput, AudioTrack, RodioAudio};
pub use clip::VideoClip;
pub use frames::{Frame, FrameStream};
pub use probe::{probe_video, VideoInfo};
pub use tools::MediaTools;

/// Errors that can occur while probing, decoding, or playing media.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// A required external tool is not available.
    #[error("tool not found: {tool} (install ffmpeg or set its path in config.toml)")]
    ToolNotFound { tool: String },

    /// An external tool exited unsuccessfully.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// Failed to parse tool output.
    #[error("failed to parse {tool} output: {message}")]
    Parse { tool: String, message: String },

    /// The file has no video stream to play.
    #[error("no video stream in {path}")]
    NoVideoStream { path: String },

    /// A requested subrange lies outside the clip.
    #[error("invalid clip range {start:.3}..{end:.3} (duration {duration:.3})")]
    InvalidRange { start: f64, end: f64, duration: f64 },

    /// Audio device or decoding failure.
    #[error("audio playback failed: {message}")]
    Audio { message: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an audio failure error.
    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio {
            message: message.into(),
        }
    }
}

/// A bounded, decodable view of a video file.
///
/// Implementations are cheap to clone conceptually: `subrange` returns a new
/// view of the same source, and `frames` may be called repeatedly, each call
/// starting a fresh decode from the view's start.
pub trait ClipSource {
    /// Native frame rate in frames per second.
    fn fps(&self) -> f64;

    /// Absolute `(start, end)` of this view within the source, in seconds.
    fn span(&self) -> (f64, f64);

    /// Duration of the whole underlying video in seconds.
    fn source_duration(&self) -> f64;

    /// Decoded frame size in pixels.
    fn frame_size(&self) -> (u32, u32);

    /// Narrow this view to the absolute range `start..end` seconds.
    ///
    /// Fails with [`MediaError::InvalidRange`] when `start` lies at or past
    /// the source's end, or when the range is empty. An `end` past the
    /// source's end is clamped, matching how a final segment runs to the
    /// video's last frame.
    fn subrange(&self, start: f64, end: f64) -> Result<Self, MediaError>
    where
        Self: Sized;

    /// Begin decoding this view's frames at the given rate.
    ///
    /// The sequence is lazy and finite; it ends when the view's last frame
    /// has been produced.
    fn frames(&self, fps: f64) -> Result<Box<dyn FrameSeq>, MediaError>;

    /// Extract this view's audio as a PCM wav on disk.
    fn audio_track(&self) -> Result<AudioTrack, MediaError>;

    /// Length of this view in seconds.
    fn len_secs(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }
}

/// A lazily produced, finite sequence of decoded frames.
pub trait FrameSeq {
    /// Produce the next frame, or `None` at the end of the clip.
    fn next_frame(&mut self) -> Result<Option<Frame>, MediaError>;
}
