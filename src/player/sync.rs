//! Clip playback with audio/video drift correction.
//!
//! [`SyncEngine`] plays one bounded clip at a time: frames stream from the
//! decoder while the audio track runs free on its own device clock, and a
//! per-frame drift accumulator keeps the two aligned. Drift is the running
//! sum of `elapsed - interval` across frame waits. When the video falls a
//! full frame behind the audio the next frame is dropped instead of drawn;
//! when it runs a full frame ahead the engine holds on the current frame
//! until the clock catches up. Pausing stops both sides together, so pause
//! time never enters the accumulator.
//!
//! The engine owns no policy: what the keys mean and what gets drawn over
//! the frame comes from the [`SessionMode`], and whether a finished pass
//! loops again comes from the caller.

use tracing::debug;

use crate::media::{AudioOutput, ClipSource, MediaError};
use crate::player::clock::FrameClock;
use crate::player::input::InputSource;
use crate::player::modes::SessionMode;
use crate::player::render::PresentationSurface;
use crate::player::state::{ClipView, ControlFlags, ExitSignal, StepDelta};

/// Drives frames, audio, input, and the clock through playback passes.
pub struct SyncEngine<'a> {
    audio: &'a mut dyn AudioOutput,
    surface: &'a mut dyn PresentationSurface,
    input: &'a mut dyn InputSource,
    clock: &'a mut dyn FrameClock,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        audio: &'a mut dyn AudioOutput,
        surface: &'a mut dyn PresentationSurface,
        input: &'a mut dyn InputSource,
        clock: &'a mut dyn FrameClock,
    ) -> Self {
        Self {
            audio,
            surface,
            input,
            clock,
        }
    }

    /// Play `clip` until the user quits, navigates away, or (when `repeat`
    /// is false) the stream ends.
    ///
    /// With `repeat` set, a naturally finished pass starts over from the
    /// top of the clip, as does a `Restart` request. `Advance` and `Rewind`
    /// end the call immediately so the caller can pick the next clip. The
    /// audio track is extracted and loaded once, then restarted from zero
    /// on every pass.
    pub fn play_clip<C: ClipSource>(
        &mut self,
        clip: &C,
        steps: &mut Vec<f64>,
        mode: &dyn SessionMode,
        repeat: bool,
    ) -> Result<ExitSignal, MediaError> {
        let view = ClipView::of(clip);
        let ms_per_frame = 1000.0 / view.fps;

        let track = clip.audio_track()?;
        self.audio.load(track.path())?;
        self.input.set_bindings(mode.bindings());

        let mut flags = ControlFlags::new();

        loop {
            self.surface.clear()?;
            let mut frames = clip.frames(view.fps)?;

            // Pull the first frame before the clock starts so decoder
            // spin-up does not count as drift.
            let mut next = frames.next_frame()?;

            flags.delta = None;
            let mut drift: f64 = 0.0;
            let mut frame_idx: usize = 0;
            let mut rendered: usize = 0;
            let mut dropped: usize = 0;

            self.clock.start(view.fps);
            self.audio.play()?;

            while let Some(frame) = next {
                // A full frame behind the audio: skip this one entirely,
                // no draw and no wait.
                if drift >= ms_per_frame {
                    drift -= ms_per_frame;
                    dropped += 1;
                    frame_idx += 1;
                    next = frames.next_frame()?;
                    continue;
                }

                // A full frame ahead: hold here until the clock catches up.
                while drift < -ms_per_frame {
                    drift += self.clock.wait_for_next_frame();
                }

                self.surface.blit_frame(&frame)?;
                mode.draw_overlay(self.surface, view, steps, frame_idx)?;
                self.surface.present()?;
                rendered += 1;

                self.poll(mode, view, steps, frame_idx, &mut flags)?;
                if flags.paused {
                    self.pause_loop(mode, view, steps, frame_idx, &mut flags)?;
                }
                if !flags.running || flags.delta.is_some() {
                    break;
                }

                drift += self.clock.wait_for_next_frame() - ms_per_frame;
                frame_idx += 1;
                next = frames.next_frame()?;
            }

            debug!(
                rendered,
                dropped,
                elapsed_ms = self.clock.now(),
                "pass finished"
            );

            // A span too short to decode yields no frames at all; treat it
            // as a finished pass rather than spinning on restarts.
            if rendered == 0 && dropped == 0 {
                break;
            }

            let again = repeat
                && flags.running
                && !matches!(
                    flags.delta,
                    Some(StepDelta::Advance) | Some(StepDelta::Rewind)
                );
            if !again {
                break;
            }
        }

        self.audio.stop();

        Ok(ExitSignal {
            running: flags.running,
            delta: flags.delta,
        })
    }

    /// Drain pending input and fold it through the mode's key policy.
    ///
    /// `delta` is cleared first, so a navigation request only survives to
    /// the frame loop if it arrived in this poll.
    fn poll(
        &mut self,
        mode: &dyn SessionMode,
        view: ClipView,
        steps: &mut Vec<f64>,
        frame_idx: usize,
        flags: &mut ControlFlags,
    ) -> Result<(), MediaError> {
        flags.delta = None;
        for event in self.input.poll_events()? {
            *flags = mode.apply_event(event, view, steps, frame_idx, *flags);
        }
        Ok(())
    }

    /// Hold the current frame while paused, keeping input responsive.
    ///
    /// Audio pauses on entry and resumes on exit, quit included, so a
    /// dropped sink never stays silently paused. Clock ticks during the
    /// hold are discarded; pause time is not drift.
    fn pause_loop(
        &mut self,
        mode: &dyn SessionMode,
        view: ClipView,
        steps: &mut Vec<f64>,
        frame_idx: usize,
        flags: &mut ControlFlags,
    ) -> Result<(), MediaError> {
        self.audio.pause();
        while flags.paused && flags.running {
            self.poll(mode, view, steps, frame_idx, flags)?;
            self.clock.wait_for_next_frame();
        }
        self.audio.resume();
        Ok(())
    }
}
