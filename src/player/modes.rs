//! Session modes: what draws over the video and what keys mean.
//!
//! The engine runs the same frame loop for recording and playback; the
//! differences live behind [`SessionMode`]. Event handling is a pure fold
//! over [`ControlFlags`] with every input spelled out as a parameter, so
//! both modes test without a terminal or a decoder.

use crate::player::input::{InputEvent, KeyBindings};
use crate::player::render::{clip_fraction, video_fraction, PresentationSurface};
use crate::player::state::{ClipView, ControlFlags, StepDelta};
use std::io;
use tracing::debug;

/// Mode-specific behavior within a playback pass.
pub trait SessionMode {
    /// Key bindings this mode wants active for its passes.
    fn bindings(&self) -> KeyBindings;

    /// Draw this mode's overlay for the frame being shown.
    fn draw_overlay(
        &self,
        surface: &mut dyn PresentationSurface,
        view: ClipView,
        steps: &[f64],
        frame_idx: usize,
    ) -> io::Result<()>;

    /// Fold one input event into the control flags.
    ///
    /// `steps` is mutable for recording's MarkStep; playback never touches
    /// it.
    fn apply_event(
        &self,
        event: InputEvent,
        view: ClipView,
        steps: &mut Vec<f64>,
        frame_idx: usize,
        flags: ControlFlags,
    ) -> ControlFlags;
}

/// Positions of the steps as fractions of the whole video.
fn step_fractions(steps: &[f64], duration: f64) -> Vec<f64> {
    if duration <= 0.0 {
        return Vec::new();
    }
    steps.iter().map(|s| s / duration).collect()
}

/// Recording a fresh step list over a single full-video pass.
///
/// Space and Enter mark the current position; the overlay is the
/// full-height video bar with the marks made so far, plus the REC badge.
pub struct RecordingMode;

impl SessionMode for RecordingMode {
    fn bindings(&self) -> KeyBindings {
        KeyBindings::recording()
    }

    fn draw_overlay(
        &self,
        surface: &mut dyn PresentationSurface,
        view: ClipView,
        steps: &[f64],
        frame_idx: usize,
    ) -> io::Result<()> {
        let fraction = video_fraction(frame_idx, view.fps, view.start, view.duration);
        surface.draw_video_progress(fraction, &step_fractions(steps, view.duration), true)?;
        surface.draw_record_badge()?;
        Ok(())
    }

    fn apply_event(
        &self,
        event: InputEvent,
        view: ClipView,
        steps: &mut Vec<f64>,
        frame_idx: usize,
        mut flags: ControlFlags,
    ) -> ControlFlags {
        match event {
            InputEvent::Quit => flags.running = false,
            InputEvent::PauseToggle => flags.paused = !flags.paused,
            InputEvent::MarkStep => {
                let timestamp = view.start + frame_idx as f64 / view.fps;
                steps.push(timestamp);
                debug!(timestamp, total = steps.len(), "marked step");
            }
            // Navigation keys are unbound while recording
            InputEvent::Advance | InputEvent::Rewind | InputEvent::Restart => {}
        }
        flags
    }
}

/// Replaying one segment of a reviewed video.
///
/// The overlay stacks the green segment bar over the red whole-video bar
/// with its step ticks; navigation keys raise the exit delta.
pub struct PlaybackMode;

impl SessionMode for PlaybackMode {
    fn bindings(&self) -> KeyBindings {
        KeyBindings::playback()
    }

    fn draw_overlay(
        &self,
        surface: &mut dyn PresentationSurface,
        view: ClipView,
        steps: &[f64],
        frame_idx: usize,
    ) -> io::Result<()> {
        surface.draw_clip_progress(clip_fraction(frame_idx, view.fps, view.len_secs()))?;
        let fraction = video_fraction(frame_idx, view.fps, view.start, view.duration);
        surface.draw_video_progress(fraction, &step_fractions(steps, view.duration), false)?;
        Ok(())
    }

    fn apply_event(
        &self,
        event: InputEvent,
        _view: ClipView,
        _steps: &mut Vec<f64>,
        _frame_idx: usize,
        mut flags: ControlFlags,
    ) -> ControlFlags {
        match event {
            InputEvent::Quit => flags.running = false,
            InputEvent::PauseToggle => flags.paused = !flags.paused,
            InputEvent::Advance => flags.delta = Some(StepDelta::Advance),
            InputEvent::Rewind => flags.delta = Some(StepDelta::Rewind),
            InputEvent::Restart => flags.delta = Some(StepDelta::Restart),
            // No step marking outside recording
            InputEvent::MarkStep => {}
        }
        flags
    }
}
