//! Step-by-step video review in the terminal.
//!
//! stepplay plays a video one marked segment at a time. The first session
//! over a video is a recording pass: the video plays through once and
//! Space marks a step at the current position. Every later session walks
//! the video segment by segment, from each step to the next, looping the
//! current segment until the user advances, rewinds, or restarts it.
//!
//! Frames come from an ffmpeg pipe and render as half-block cells straight
//! to the terminal, while the audio track plays through the system output.
//! A per-frame drift accumulator keeps the two aligned; see
//! [`player::sync`] for the correction loop.
//!
//! The crate splits into:
//! - [`media`]: ffprobe/ffmpeg plumbing, frame streams, audio extraction
//! - [`player`]: the sync engine, session modes, and segment navigation
//! - [`store`]: persisted step lists keyed by video path
//! - [`config`]: optional config file for tool paths and the data dir

pub mod config;
pub mod media;
pub mod player;
pub mod store;
pub mod version;

pub use config::Config;
pub use media::{MediaError, MediaTools, VideoClip};
pub use player::{StepNavigator, SyncEngine};
pub use store::StepStore;
