//! Lazily decoded video frames over an ffmpeg pipe.
//!
//! Frames arrive as packed RGB24 on the child's stdout, one `width *
//! height * 3` byte block per frame, pre-scaled and resampled to the
//! requested rate by ffmpeg's `fps` and `scale` filters. Reading is pull
//! driven: the playback loop asks for exactly one frame at a time, so a
//! stalled consumer backpressures the decoder through the pipe instead of
//! buffering the whole clip.

use crate::media::{FrameSeq, MediaError, MediaTools};
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, warn};

/// One decoded frame, packed RGB24.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed `R G B` bytes, row-major, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl Frame {
    /// Pixel at `(x, y)`. Callers stay within `width`/`height`.
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = ((y * self.width + x) * 3) as usize;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }
}

/// A running ffmpeg decode of one clip, read frame by frame.
///
/// Dropping the stream mid-clip kills the child process.
pub struct FrameStream {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    finished: bool,
}

impl FrameStream {
    /// Spawn an ffmpeg child decoding `path` over `start..end` seconds,
    /// resampled to `fps` and scaled to exactly `width` x `height`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        tools: &MediaTools,
        path: &Path,
        start: f64,
        end: f64,
        fps: f64,
        width: u32,
        height: u32,
    ) -> Result<Self, MediaError> {
        let mut child = Command::new(tools.ffmpeg())
            .args(["-v", "error"])
            .args(["-ss", &format!("{:.6}", start)])
            .arg("-i")
            .arg(path)
            .args(["-t", &format!("{:.6}", end - start)])
            .args(["-vf", &format!("fps={},scale={}:{}", fps, width, height)])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-an", "-sn"])
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MediaError::tool_not_found("ffmpeg")
                } else {
                    MediaError::Io(e)
                }
            })?;

        debug!(
            path = %path.display(),
            start, end, fps, width, height,
            "spawned frame decoder"
        );

        // stdout was requested piped, so it is present on a spawned child
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::tool_failed("ffmpeg", "no stdout pipe"))?;

        Ok(Self {
            child,
            stdout,
            width,
            height,
            finished: false,
        })
    }

    /// Reap the child after a clean end of stream.
    fn finish(&mut self) -> Result<(), MediaError> {
        self.finished = true;

        let mut stderr_text = String::new();
        if let Some(stderr) = self.child.stderr.as_mut() {
            let _ = stderr.read_to_string(&mut stderr_text);
        }
        let status = self.child.wait()?;
        if !status.success() {
            return Err(MediaError::tool_failed(
                "ffmpeg",
                format!("decode failed ({}): {}", status, stderr_text.trim()),
            ));
        }
        Ok(())
    }
}

impl FrameSeq for FrameStream {
    fn next_frame(&mut self) -> Result<Option<Frame>, MediaError> {
        if self.finished {
            return Ok(None);
        }

        let frame_len = (self.width * self.height * 3) as usize;
        let mut data = vec![0u8; frame_len];
        let filled = read_full(&mut self.stdout, &mut data)?;

        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }
        if filled < frame_len {
            self.finished = true;
            let _ = self.child.kill();
            let _ = self.child.wait();
            return Err(MediaError::tool_failed(
                "ffmpeg",
                format!("truncated frame: got {} of {} bytes", filled, frame_len),
            ));
        }

        Ok(Some(Frame {
            width: self.width,
            height: self.height,
            data,
        }))
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.child.kill() {
                warn!("failed to kill frame decoder: {}", e);
            }
            let _ = self.child.wait();
        }
    }
}

/// Read until `buf` is full or the reader hits end of stream.
///
/// Returns the number of bytes actually read; a pipe can hand back short
/// reads well below the frame size.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
