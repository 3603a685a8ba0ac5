//! Player state types
//!
//! Shared value types passed between the sync engine, session modes, and
//! the step navigator. Everything here is plain data; the engine owns the
//! control flow.

use crate::media::ClipSource;

/// Navigation request raised during a playback pass.
///
/// Maps to the segment index arithmetic the navigator applies on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDelta {
    /// Go back one segment (bottoms out at the first)
    Rewind,
    /// Replay the current segment from its start
    Restart,
    /// Move on to the next segment
    Advance,
}

/// Live control state during a pass, updated by event handling.
///
/// `delta` resets to `None` at the top of every input poll, so it only
/// reflects navigation requested since the last rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags {
    /// False once the user asked to quit the session
    pub running: bool,
    /// True while playback is paused
    pub paused: bool,
    /// Navigation requested in the current poll, if any
    pub delta: Option<StepDelta>,
}

impl ControlFlags {
    /// Flags at the start of a pass: running, unpaused, no request.
    pub fn new() -> Self {
        Self {
            running: true,
            paused: false,
            delta: None,
        }
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// How a playback pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSignal {
    /// False when the user quit during the pass
    pub running: bool,
    /// Navigation request that ended the pass; `None` on natural end
    pub delta: Option<StepDelta>,
}

/// Copyable snapshot of the clip a pass is playing.
///
/// Session modes only need these numbers, never the decoder itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipView {
    /// Frame rate the pass runs at
    pub fps: f64,
    /// Absolute start of the clip within the video, seconds
    pub start: f64,
    /// Absolute end of the clip within the video, seconds
    pub end: f64,
    /// Duration of the whole video, seconds
    pub duration: f64,
}

impl ClipView {
    /// Snapshot the given clip.
    pub fn of(clip: &impl ClipSource) -> Self {
        let (start, end) = clip.span();
        Self {
            fps: clip.fps(),
            start,
            end,
            duration: clip.source_duration(),
        }
    }

    /// Length of the clip in seconds.
    pub fn len_secs(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flags_are_running_and_unpaused() {
        let flags = ControlFlags::new();
        assert!(flags.running);
        assert!(!flags.paused);
        assert_eq!(flags.delta, None);
    }

    #[test]
    fn clip_view_length_is_span_width() {
        let view = ClipView {
            fps: 30.0,
            start: 5.0,
            end: 12.0,
            duration: 20.0,
        };
        assert_eq!(view.len_secs(), 7.0);
    }
}
