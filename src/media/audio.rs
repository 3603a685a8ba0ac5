//! Audio extraction and playback.
//!
//! The clip's audio is extracted once per playback pass into a scratch PCM
//! wav (deleted when the [`AudioTrack`] drops) and played through rodio.
//! A repeat loops the same wav from the top: [`AudioOutput::play`] always
//! restarts at offset zero by rebuilding the sink.

use crate::media::{MediaError, MediaTools};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

/// A playback sink for extracted clip audio.
pub trait AudioOutput {
    /// Load a wav file for subsequent [`play`](AudioOutput::play) calls,
    /// validating that it decodes.
    fn load(&mut self, wav: &Path) -> Result<(), MediaError>;

    /// Start (or restart) playback of the loaded track from offset zero.
    fn play(&mut self) -> Result<(), MediaError>;

    /// Pause playback, keeping the position.
    fn pause(&mut self);

    /// Resume playback after a pause.
    fn resume(&mut self);

    /// Stop playback and discard the position.
    fn stop(&mut self);
}

/// Extracted audio for one clip, stored as a scratch wav on disk.
///
/// The file is deleted when the track drops, so it lives exactly as long as
/// the pass that extracted it.
pub struct AudioTrack {
    path: PathBuf,
    _file: Option<NamedTempFile>,
}

impl AudioTrack {
    /// Path to the wav file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Track handle for tests that never touch the file.
    #[cfg(test)]
    pub(crate) fn stub() -> Self {
        Self {
            path: PathBuf::from("stub.wav"),
            _file: None,
        }
    }
}

/// Extract `start..end` seconds of `path`'s audio to a scratch PCM wav.
pub(crate) fn extract_wav(
    tools: &MediaTools,
    path: &Path,
    start: f64,
    end: f64,
) -> Result<AudioTrack, MediaError> {
    let file = tempfile::Builder::new()
        .prefix("stepplay-")
        .suffix(".wav")
        .tempfile()?;

    // -y: the temp file already exists on disk
    let output = Command::new(tools.ffmpeg())
        .args(["-v", "error", "-y"])
        .args(["-ss", &format!("{:.6}", start)])
        .arg("-i")
        .arg(path)
        .args(["-t", &format!("{:.6}", end - start)])
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "44100", "-ac", "2"])
        .args(["-f", "wav"])
        .arg(file.path())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::tool_not_found("ffmpeg")
            } else {
                MediaError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::tool_failed(
            "ffmpeg",
            format!("audio extraction failed: {}", stderr.trim()),
        ));
    }

    debug!(path = %path.display(), start, end, "extracted clip audio");

    Ok(AudioTrack {
        path: file.path().to_path_buf(),
        _file: Some(file),
    })
}

/// Rodio-backed audio output.
///
/// Owns the output stream for the whole session; the device is released
/// when this drops.
pub struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
}

impl RodioAudio {
    /// Open the default audio output device.
    pub fn new() -> Result<Self, MediaError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MediaError::audio(format!("no output device: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            loaded: None,
        })
    }

    fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, MediaError> {
        let file = File::open(path)?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| MediaError::audio(format!("cannot decode {}: {}", path.display(), e)))
    }
}

impl AudioOutput for RodioAudio {
    fn load(&mut self, wav: &Path) -> Result<(), MediaError> {
        // Decode up front so a broken extraction fails the pass before
        // any frame renders.
        let _ = Self::open_source(wav)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.loaded = Some(wav.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let path = self
            .loaded
            .as_ref()
            .ok_or_else(|| MediaError::audio("no track loaded"))?;
        let source = Self::open_source(path)?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| MediaError::audio(format!("cannot open sink: {}", e)))?;
        sink.append(source);
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
