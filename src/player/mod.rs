//! Interactive step playback module
//!
//! Everything that runs once a video is on screen:
//!
//! - `sync`: drift-corrected clip playback against the audio track
//! - `navigator`: the step-by-step session walking clip segments
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `state`: shared value types (ControlFlags, StepDelta, ClipView)
//! - `clock`: the frame pacing clock
//! - `input/`: key bindings and terminal event polling
//! - `modes`: recording vs playback key policy and overlays
//! - `render/`: frame blitting and progress bars on the terminal
//!
//! The engine only sees trait objects at its seams, so every piece swaps
//! out in tests for a scripted double.

pub mod clock;
#[cfg(test)]
pub(crate) mod harness;
pub mod input;
pub mod modes;
pub mod navigator;
pub mod render;
pub mod state;
pub mod sync;

pub use clock::{FrameClock, WallClock};
pub use navigator::StepNavigator;
pub use state::{ClipView, ControlFlags, ExitSignal, StepDelta};
pub use sync::SyncEngine;
