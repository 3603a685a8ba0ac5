//! Segment walking across a recorded step list.
//!
//! [`StepNavigator`] turns a step list into playable segments and drives
//! the sync engine through them one at a time. Each segment runs from one
//! step to the next (the last runs to the end of the video) and loops
//! until the user advances, rewinds, or quits. An empty step list means
//! the video has no marks yet, so the session starts with a recording
//! pass over the whole video and persists whatever got marked.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::media::{ClipSource, MediaError};
use crate::player::modes::{PlaybackMode, RecordingMode};
use crate::player::state::StepDelta;
use crate::player::sync::SyncEngine;
use crate::store::StepStore;

/// Bounds of the segment at `idx`, or `None` once past the last step.
///
/// The final segment runs to the whole second before the end of the
/// video, which keeps the decoder away from a ragged trailing fraction.
fn segment_bounds(steps: &[f64], idx: usize, duration: f64) -> Option<(f64, f64)> {
    let start = *steps.get(idx)?;
    let end = steps
        .get(idx + 1)
        .copied()
        .unwrap_or_else(|| duration.floor());
    Some((start, end))
}

/// Apply a navigation request to a segment index.
fn advance_index(idx: usize, delta: StepDelta) -> usize {
    match delta {
        StepDelta::Rewind => idx.saturating_sub(1),
        StepDelta::Restart => idx,
        StepDelta::Advance => idx + 1,
    }
}

/// Walks a clip segment by segment, recording steps first when none exist.
pub struct StepNavigator<C: ClipSource> {
    clip: C,
    video: PathBuf,
    steps: Vec<f64>,
    step_idx: usize,
}

impl<C: ClipSource> StepNavigator<C> {
    /// `video` is the store key for persistence, normally the canonical
    /// path of the file `clip` decodes.
    pub fn new(clip: C, video: PathBuf, steps: Vec<f64>) -> Self {
        Self {
            clip,
            video,
            steps,
            step_idx: 0,
        }
    }

    /// Steps currently held, recorded or loaded.
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Run the whole session: a recording pass if no steps exist yet,
    /// then segment playback until the session ends.
    ///
    /// The step list is persisted after recording no matter how the pass
    /// ended. Marks made before a quit or a decoder failure are work the
    /// user already did, so they are kept.
    pub fn run(&mut self, engine: &mut SyncEngine, store: &StepStore) -> Result<()> {
        if self.steps.is_empty() {
            debug!(video = %self.video.display(), "no steps on record, starting a marking pass");
            match self.record(engine) {
                Err(err) => {
                    if let Err(store_err) = store.set_steps(&self.video, &self.steps) {
                        warn!(error = %store_err, "could not save marked steps after playback failure");
                    }
                    return Err(err.into());
                }
                Ok(keep_going) => {
                    store
                        .set_steps(&self.video, &self.steps)
                        .context("failed to save the recorded step list")?;
                    debug!(count = self.steps.len(), "step list saved");
                    if !keep_going {
                        return Ok(());
                    }
                }
            }
        }
        self.play(engine)?;
        Ok(())
    }

    /// One non-repeating pass over the whole video with marking keys
    /// active. Returns false when the user quit during the pass.
    fn record(&mut self, engine: &mut SyncEngine) -> Result<bool, MediaError> {
        let exit = engine.play_clip(&self.clip, &mut self.steps, &RecordingMode, false)?;
        Ok(exit.running)
    }

    /// Loop segments until the user quits or walks off either end.
    fn play(&mut self, engine: &mut SyncEngine) -> Result<(), MediaError> {
        let duration = self.clip.source_duration();
        loop {
            let Some((start, end)) = segment_bounds(&self.steps, self.step_idx, duration) else {
                debug!(idx = self.step_idx, "no segment left to play");
                break;
            };
            let segment = match self.clip.subrange(start, end) {
                Ok(segment) => segment,
                Err(MediaError::InvalidRange { .. }) => {
                    debug!(start, end, "segment span not playable, ending session");
                    break;
                }
                Err(err) => return Err(err),
            };

            debug!(idx = self.step_idx, start, end, "playing segment");
            let exit = engine.play_clip(&segment, &mut self.steps, &PlaybackMode, true)?;
            if !exit.running {
                break;
            }
            match exit.delta {
                Some(delta) => self.step_idx = advance_index(self.step_idx, delta),
                // A repeating pass only comes back without a request when
                // the segment decoded to nothing. Nothing to hold on, so
                // the session is over.
                None => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::harness::{FakeClip, ScriptedInput, TestAudio, TestClock, TestSurface};
    use crate::player::input::InputEvent;
    use std::path::Path;

    struct Session {
        audio: TestAudio,
        surface: TestSurface,
        input: ScriptedInput,
        clock: TestClock,
        store: StepStore,
    }

    impl Session {
        fn new(polls: Vec<Vec<InputEvent>>) -> Self {
            Self {
                audio: TestAudio::new(),
                surface: TestSurface::new(4, 4),
                input: ScriptedInput::new(polls),
                clock: TestClock::ideal(),
                store: StepStore::open_in_memory().unwrap(),
            }
        }

        fn run<C: ClipSource>(&mut self, nav: &mut StepNavigator<C>) -> Result<()> {
            let mut engine = SyncEngine::new(
                &mut self.audio,
                &mut self.surface,
                &mut self.input,
                &mut self.clock,
            );
            nav.run(&mut engine, &self.store)
        }
    }

    fn make_nav(clip: FakeClip, steps: Vec<f64>) -> StepNavigator<FakeClip> {
        StepNavigator::new(clip, PathBuf::from("demo.mp4"), steps)
    }

    #[test]
    fn segment_bounds_span_step_to_step() {
        let steps = [5.0, 12.0];
        assert_eq!(segment_bounds(&steps, 0, 20.4), Some((5.0, 12.0)));
    }

    #[test]
    fn last_segment_runs_to_the_floored_end() {
        let steps = [5.0, 12.0];
        assert_eq!(segment_bounds(&steps, 1, 20.4), Some((12.0, 20.0)));
    }

    #[test]
    fn bounds_past_the_last_step_are_none() {
        let steps = [5.0, 12.0];
        assert_eq!(segment_bounds(&steps, 2, 20.4), None);
        assert_eq!(segment_bounds(&[], 0, 20.4), None);
    }

    #[test]
    fn advance_index_moves_both_ways_and_clamps() {
        assert_eq!(advance_index(1, StepDelta::Advance), 2);
        assert_eq!(advance_index(1, StepDelta::Rewind), 0);
        assert_eq!(advance_index(0, StepDelta::Rewind), 0);
        assert_eq!(advance_index(3, StepDelta::Restart), 3);
    }

    #[test]
    fn plays_segments_in_order_until_past_the_end() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let spans = clip.spans.clone();
        let mut session = Session::new(vec![
            vec![InputEvent::Advance],
            vec![InputEvent::Advance],
        ]);
        let mut nav = make_nav(clip, vec![5.0, 12.0]);

        session.run(&mut nav).unwrap();

        assert_eq!(*spans.borrow(), vec![(5.0, 12.0), (12.0, 20.0)]);
        assert_eq!(session.audio.plays, 2);
    }

    #[test]
    fn rewind_clamps_at_the_first_segment() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let spans = clip.spans.clone();
        let mut session = Session::new(vec![
            vec![InputEvent::Rewind],
            vec![InputEvent::Advance],
            vec![InputEvent::Quit],
        ]);
        let mut nav = make_nav(clip, vec![5.0, 12.0]);

        session.run(&mut nav).unwrap();

        assert_eq!(
            *spans.borrow(),
            vec![(5.0, 12.0), (5.0, 12.0), (12.0, 20.0)]
        );
    }

    #[test]
    fn restart_loops_inside_a_single_segment() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let spans = clip.spans.clone();
        let mut session = Session::new(vec![
            vec![InputEvent::Restart],
            vec![InputEvent::Quit],
        ]);
        let mut nav = make_nav(clip, vec![5.0, 12.0]);

        session.run(&mut nav).unwrap();

        // One subrange, two playback passes: the restart never left the
        // engine.
        assert_eq!(*spans.borrow(), vec![(5.0, 12.0)]);
        assert_eq!(session.audio.plays, 2);
        assert_eq!(session.surface.clears, 2);
    }

    #[test]
    fn preloaded_steps_skip_the_recording_pass() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let mut session = Session::new(vec![vec![InputEvent::Quit]]);
        let mut nav = make_nav(clip, vec![5.0, 12.0]);

        session.run(&mut nav).unwrap();

        assert_eq!(session.surface.badges, 0);
        assert_eq!(
            session.store.steps_for(Path::new("demo.mp4")).unwrap(),
            Vec::<f64>::new()
        );
    }

    #[test]
    fn recording_pass_persists_marks_then_plays() {
        let clip = FakeClip::new(1.0, 5.0, 5);
        let mut session = Session::new(vec![
            vec![],
            vec![InputEvent::MarkStep],
            vec![],
            vec![InputEvent::MarkStep],
            vec![],
            vec![InputEvent::Quit],
        ]);
        let mut nav = make_nav(clip, vec![]);

        session.run(&mut nav).unwrap();

        assert_eq!(
            session.store.steps_for(Path::new("demo.mp4")).unwrap(),
            vec![1.0, 3.0]
        );
        // The recording pass drew its badge on every frame, then playback
        // of the first segment started before the quit.
        assert_eq!(session.surface.badges, 5);
        assert_eq!(session.audio.plays, 2);
    }

    #[test]
    fn quitting_the_recording_pass_still_persists() {
        let clip = FakeClip::new(1.0, 5.0, 5);
        let mut session = Session::new(vec![
            vec![InputEvent::MarkStep],
            vec![InputEvent::Quit],
        ]);
        let mut nav = make_nav(clip, vec![]);

        session.run(&mut nav).unwrap();

        assert_eq!(
            session.store.steps_for(Path::new("demo.mp4")).unwrap(),
            vec![0.0]
        );
        // No playback after a quit.
        assert_eq!(session.audio.plays, 1);
    }

    #[test]
    fn decoder_failure_mid_recording_keeps_the_marks() {
        let mut clip = FakeClip::new(1.0, 5.0, 5);
        clip.fail_frame_at = Some(2);
        let mut session = Session::new(vec![vec![InputEvent::MarkStep]]);
        let mut nav = make_nav(clip, vec![]);

        let err = session.run(&mut nav).unwrap_err();

        assert!(err.to_string().contains("ffmpeg"));
        assert_eq!(
            session.store.steps_for(Path::new("demo.mp4")).unwrap(),
            vec![0.0]
        );
    }

    #[test]
    fn recording_without_marks_ends_the_session() {
        let clip = FakeClip::new(1.0, 3.0, 3);
        let mut session = Session::new(vec![]);
        let mut nav = make_nav(clip, vec![]);

        session.run(&mut nav).unwrap();

        assert_eq!(
            session.store.steps_for(Path::new("demo.mp4")).unwrap(),
            Vec::<f64>::new()
        );
        // Nothing to step through afterwards.
        assert_eq!(session.audio.plays, 1);
    }

    #[test]
    fn step_past_the_video_end_ends_quietly() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let mut session = Session::new(vec![]);
        let mut nav = make_nav(clip, vec![25.0]);

        session.run(&mut nav).unwrap();

        assert_eq!(session.audio.plays, 0);
        assert_eq!(session.surface.clears, 0);
    }

    #[test]
    fn segment_too_short_to_decode_ends_quietly() {
        let clip = FakeClip::new(1.0, 20.4, 20);
        let mut session = Session::new(vec![]);
        let mut nav = make_nav(clip, vec![19.7]);

        session.run(&mut nav).unwrap();

        // The span was accepted but produced no frames.
        assert_eq!(session.audio.plays, 1);
        assert!(session.surface.blits.is_empty());
    }
}
