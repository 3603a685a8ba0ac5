//! Progress bar geometry.
//!
//! Pure math for the overlay bars: how far along the current segment and
//! the whole video playback is, and which columns carry step tick marks.
//! Painting happens in the surface; everything here is testable without a
//! terminal.

/// One cell of a progress bar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCell {
    /// Played portion of the bar
    Filled,
    /// Unplayed portion of the bar
    Empty,
    /// A step tick mark (drawn over filled and empty alike)
    Tick,
}

/// Fraction of the current clip played at frame `frame_idx`.
pub fn clip_fraction(frame_idx: usize, fps: f64, clip_len_secs: f64) -> f64 {
    if fps <= 0.0 || clip_len_secs <= 0.0 {
        return 1.0;
    }
    (frame_idx as f64 / (fps * clip_len_secs)).clamp(0.0, 1.0)
}

/// Fraction of the whole video played at frame `frame_idx` of a clip
/// starting at `clip_start` seconds.
pub fn video_fraction(frame_idx: usize, fps: f64, clip_start: f64, duration: f64) -> f64 {
    if fps <= 0.0 || duration <= 0.0 {
        return 1.0;
    }
    ((fps * clip_start + frame_idx as f64) / (fps * duration)).clamp(0.0, 1.0)
}

/// Columns (0-based) of tick marks for positions given as fractions of the
/// bar, deduplicated and clamped to the bar width.
pub fn tick_columns(width: usize, fractions: &[f64]) -> Vec<usize> {
    if width == 0 {
        return Vec::new();
    }
    let mut cols: Vec<usize> = fractions
        .iter()
        .map(|f| ((f.clamp(0.0, 1.0)) * width as f64) as usize)
        .map(|c| c.min(width - 1))
        .collect();
    cols.sort_unstable();
    cols.dedup();
    cols
}

/// Build one bar row of `width` cells, `fraction` filled, with tick marks
/// at the given columns.
pub fn build_bar_cells(width: usize, fraction: f64, ticks: &[usize]) -> Vec<BarCell> {
    let filled = (width as f64 * fraction.clamp(0.0, 1.0)) as usize;

    let mut cells: Vec<BarCell> = (0..width)
        .map(|i| {
            if i < filled {
                BarCell::Filled
            } else {
                BarCell::Empty
            }
        })
        .collect();

    for &tick in ticks {
        if tick < width {
            cells[tick] = BarCell::Tick;
        }
    }

    cells
}
