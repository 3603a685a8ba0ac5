//! Rendering for playback and recording sessions.
//!
//! The engine and session modes talk to a [`PresentationSurface`]; the
//! production implementation paints into the terminal. Bar geometry is pure
//! and lives in `progress`, so the interesting math has unit tests while
//! the painting stays a thin ANSI layer.

mod progress;
mod surface;

pub use progress::{build_bar_cells, clip_fraction, tick_columns, video_fraction, BarCell};
pub use surface::TerminalSurface;

use crate::media::Frame;
use std::io;

/// Where a session draws.
///
/// Drawing calls compose into an off-screen buffer; nothing reaches the
/// user until [`present`](PresentationSurface::present). The surface owns
/// whatever device state it needs and restores it when dropped.
pub trait PresentationSurface {
    /// Pixel area available for video frames (width, height).
    fn frame_area(&self) -> (u32, u32);

    /// Blank the whole surface (start of a pass).
    fn clear(&mut self) -> io::Result<()>;

    /// Draw a decoded frame at the top-left of the frame area.
    fn blit_frame(&mut self, frame: &Frame) -> io::Result<()>;

    /// Draw the segment progress bar.
    fn draw_clip_progress(&mut self, fraction: f64) -> io::Result<()>;

    /// Draw the whole-video progress bar with step tick marks.
    ///
    /// `ticks` are positions as fractions of the video. With `full_height`
    /// the bar takes the whole progress area (recording mode, where no
    /// segment bar exists).
    fn draw_video_progress(
        &mut self,
        fraction: f64,
        ticks: &[f64],
        full_height: bool,
    ) -> io::Result<()>;

    /// Draw the recording indicator.
    fn draw_record_badge(&mut self) -> io::Result<()>;

    /// Flush everything drawn since the last present to the user.
    fn present(&mut self) -> io::Result<()>;
}
