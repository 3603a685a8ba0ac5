//! Video clip views.
//!
//! A [`VideoClip`] is a lightweight handle: path, probed metadata, and the
//! span it covers. Narrowing to a segment or changing the output size never
//! touches ffmpeg; decoding only starts when [`ClipSource::frames`] or
//! [`ClipSource::audio_track`] is called.

use crate::media::audio::extract_wav;
use crate::media::probe::{probe_video, VideoInfo};
use crate::media::{AudioTrack, ClipSource, FrameSeq, FrameStream, MediaError, MediaTools};
use std::path::{Path, PathBuf};

/// A bounded view of a video file on disk.
#[derive(Debug, Clone)]
pub struct VideoClip {
    tools: MediaTools,
    path: PathBuf,
    info: VideoInfo,
    start: f64,
    end: f64,
    out_width: u32,
    out_height: u32,
}

impl VideoClip {
    /// Open a video file, probing its metadata. The resulting view covers
    /// the whole video at its native size.
    pub fn open(tools: &MediaTools, path: &Path) -> Result<Self, MediaError> {
        let info = probe_video(tools, path)?;
        Ok(Self {
            tools: tools.clone(),
            path: path.to_path_buf(),
            start: 0.0,
            end: info.duration,
            out_width: info.width,
            out_height: info.height,
            info,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shrink (or grow) the decoded output to fit within `max_w` x `max_h`
    /// while preserving the aspect ratio.
    pub fn fit_to(&mut self, max_w: u32, max_h: u32) {
        let (w, h) = fit_size((self.info.width, self.info.height), (max_w, max_h));
        self.out_width = w;
        self.out_height = h;
    }
}

impl ClipSource for VideoClip {
    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn source_duration(&self) -> f64 {
        self.info.duration
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.out_width, self.out_height)
    }

    fn subrange(&self, start: f64, end: f64) -> Result<Self, MediaError> {
        let duration = self.info.duration;
        if start < 0.0 || start >= duration || end <= start {
            return Err(MediaError::InvalidRange {
                start,
                end,
                duration,
            });
        }
        Ok(Self {
            start,
            end: end.min(duration),
            ..self.clone()
        })
    }

    fn frames(&self, fps: f64) -> Result<Box<dyn FrameSeq>, MediaError> {
        let stream = FrameStream::spawn(
            &self.tools,
            &self.path,
            self.start,
            self.end,
            fps,
            self.out_width,
            self.out_height,
        )?;
        Ok(Box::new(stream))
    }

    fn audio_track(&self) -> Result<AudioTrack, MediaError> {
        extract_wav(&self.tools, &self.path, self.start, self.end)
    }
}

/// Largest size within `max` that keeps `native`'s aspect ratio.
fn fit_size(native: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (nw, nh) = (native.0.max(1) as f64, native.1.max(1) as f64);
    let (mw, mh) = (max.0.max(1) as f64, max.1.max(1) as f64);
    let scale = (mw / nw).min(mh / nh);
    (
        ((nw * scale) as u32).max(1),
        ((nh * scale) as u32).max(1),
    )
}
