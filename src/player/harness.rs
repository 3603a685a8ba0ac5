//! Scripted collaborators for player tests.
//!
//! Every seam the engine talks to has a deterministic double here: a clock
//! replaying scripted elapsed times, a clip producing numbered frames, a
//! surface recording draw calls, an audio sink counting its lifecycle, and
//! an input source playing back queued polls. Nothing sleeps and nothing
//! touches a device, so the timing scenarios run exact.

use crate::media::{AudioOutput, AudioTrack, ClipSource, Frame, FrameSeq, MediaError};
use crate::player::clock::FrameClock;
use crate::player::input::{InputEvent, InputSource};
use crate::player::render::PresentationSurface;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::rc::Rc;

/// Clock replaying scripted elapsed values, ideal pacing once exhausted.
pub(crate) struct TestClock {
    interval_ms: f64,
    scripted: VecDeque<f64>,
    now_ms: f64,
    /// Total wait calls across all passes
    pub ticks: usize,
    /// Number of `start` calls (one per pass)
    pub passes: usize,
}

impl TestClock {
    /// Every tick takes exactly one frame interval.
    pub fn ideal() -> Self {
        Self::scripted([])
    }

    /// The first ticks return the given elapsed values, then ideal pacing.
    pub fn scripted(elapsed: impl IntoIterator<Item = f64>) -> Self {
        Self {
            interval_ms: 0.0,
            scripted: elapsed.into_iter().collect(),
            now_ms: 0.0,
            ticks: 0,
            passes: 0,
        }
    }
}

impl FrameClock for TestClock {
    fn start(&mut self, fps: f64) {
        self.interval_ms = 1000.0 / fps;
        self.now_ms = 0.0;
        self.passes += 1;
    }

    fn wait_for_next_frame(&mut self) -> f64 {
        let elapsed = self.scripted.pop_front().unwrap_or(self.interval_ms);
        self.now_ms += elapsed;
        self.ticks += 1;
        elapsed
    }

    fn now(&self) -> f64 {
        self.now_ms
    }
}

/// Clip double producing a fixed number of numbered frames per pass.
///
/// `subrange` logs the requested span into the shared `spans` list, so a
/// test can watch which segments a session walked through.
#[derive(Clone)]
pub(crate) struct FakeClip {
    pub fps: f64,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub frames_per_pass: usize,
    pub fail_audio: bool,
    pub fail_frame_at: Option<usize>,
    pub spans: Rc<RefCell<Vec<(f64, f64)>>>,
}

impl FakeClip {
    pub fn new(fps: f64, duration: f64, frames_per_pass: usize) -> Self {
        Self {
            fps,
            start: 0.0,
            end: duration,
            duration,
            frames_per_pass,
            fail_audio: false,
            fail_frame_at: None,
            spans: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ClipSource for FakeClip {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn source_duration(&self) -> f64 {
        self.duration
    }

    fn frame_size(&self) -> (u32, u32) {
        (1, 1)
    }

    fn subrange(&self, start: f64, end: f64) -> Result<Self, MediaError> {
        self.spans.borrow_mut().push((start, end));
        if start < 0.0 || start >= self.duration || end <= start {
            return Err(MediaError::InvalidRange {
                start,
                end,
                duration: self.duration,
            });
        }
        let end = end.min(self.duration);
        let frames = ((end - start) * self.fps).round() as usize;
        Ok(Self {
            start,
            end,
            frames_per_pass: frames,
            ..self.clone()
        })
    }

    fn frames(&self, _fps: f64) -> Result<Box<dyn FrameSeq>, MediaError> {
        Ok(Box::new(NumberedFrames {
            next: 0,
            total: self.frames_per_pass,
            fail_at: self.fail_frame_at,
        }))
    }

    fn audio_track(&self) -> Result<AudioTrack, MediaError> {
        if self.fail_audio {
            return Err(MediaError::audio("scripted extraction failure"));
        }
        Ok(AudioTrack::stub())
    }
}

/// Finite sequence of 1x1 frames, each carrying its index in the red
/// channel so surface recordings show exactly which frames rendered.
pub(crate) struct NumberedFrames {
    next: usize,
    total: usize,
    fail_at: Option<usize>,
}

impl FrameSeq for NumberedFrames {
    fn next_frame(&mut self) -> Result<Option<Frame>, MediaError> {
        if self.fail_at == Some(self.next) {
            return Err(MediaError::tool_failed("ffmpeg", "scripted frame failure"));
        }
        if self.next >= self.total {
            return Ok(None);
        }
        let id = (self.next % 256) as u8;
        self.next += 1;
        Ok(Some(Frame {
            width: 1,
            height: 1,
            data: vec![id, 0, 0],
        }))
    }
}

/// One recorded video-bar draw.
pub(crate) struct VideoBar {
    pub fraction: f64,
    pub ticks: Vec<f64>,
    pub full_height: bool,
}

/// Surface double recording every draw call.
pub(crate) struct TestSurface {
    area: (u32, u32),
    pub clears: usize,
    /// Frame ids in blit order
    pub blits: Vec<u8>,
    pub clip_bars: Vec<f64>,
    pub video_bars: Vec<VideoBar>,
    pub badges: usize,
    pub presents: usize,
}

impl TestSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            area: (width, height),
            clears: 0,
            blits: Vec::new(),
            clip_bars: Vec::new(),
            video_bars: Vec::new(),
            badges: 0,
            presents: 0,
        }
    }
}

impl PresentationSurface for TestSurface {
    fn frame_area(&self) -> (u32, u32) {
        self.area
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn blit_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.blits.push(frame.data[0]);
        Ok(())
    }

    fn draw_clip_progress(&mut self, fraction: f64) -> io::Result<()> {
        self.clip_bars.push(fraction);
        Ok(())
    }

    fn draw_video_progress(
        &mut self,
        fraction: f64,
        ticks: &[f64],
        full_height: bool,
    ) -> io::Result<()> {
        self.video_bars.push(VideoBar {
            fraction,
            ticks: ticks.to_vec(),
            full_height,
        });
        Ok(())
    }

    fn draw_record_badge(&mut self) -> io::Result<()> {
        self.badges += 1;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }
}

/// Audio double counting lifecycle calls.
#[derive(Default)]
pub(crate) struct TestAudio {
    pub loads: usize,
    pub plays: usize,
    pub pauses: usize,
    pub resumes: usize,
    pub stops: usize,
    pub fail_load: bool,
}

impl TestAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for TestAudio {
    fn load(&mut self, _wav: &Path) -> Result<(), MediaError> {
        if self.fail_load {
            return Err(MediaError::audio("scripted load failure"));
        }
        self.loads += 1;
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

/// Input double playing back one event batch per poll, then silence.
pub(crate) struct ScriptedInput {
    polls: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(polls: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            polls: polls.into_iter().collect(),
        }
    }

    /// Never reports any events.
    pub fn silent() -> Self {
        Self::new([])
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.polls.pop_front().unwrap_or_default())
    }
}
