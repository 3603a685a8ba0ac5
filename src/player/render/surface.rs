//! Terminal presentation surface.
//!
//! Video frames paint as half-block cells: `▀` with a 24-bit foreground for
//! the upper pixel and background for the lower one, giving two vertical
//! pixels per character cell. The bottom two rows are the progress area.
//!
//! Construction enables raw mode and enters the alternate screen; both are
//! restored on drop, so every exit path (including errors unwinding through
//! the session) puts the terminal back.

use crate::media::Frame;
use crate::player::render::{build_bar_cells, tick_columns, BarCell, PresentationSurface};
use crossterm::terminal;
use std::io::{self, Write};
use tracing::debug;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BRIGHT_RED: &str = "\x1b[91m";
const WHITE: &str = "\x1b[97m";
const DARK_GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Rows at the bottom reserved for progress bars.
const PROGRESS_ROWS: u16 = 2;

/// Fullscreen terminal surface with half-block video rendering.
pub struct TerminalSurface {
    out: io::Stdout,
    cols: u16,
    rows: u16,
    buf: String,
}

impl TerminalSurface {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        if cols < 20 || rows <= PROGRESS_ROWS + 2 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("terminal too small for playback ({}x{})", cols, rows),
            ));
        }

        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        // Alternate screen, clear, hide cursor
        if let Err(e) = write!(out, "\x1b[?1049h\x1b[2J\x1b[?25l").and_then(|_| out.flush()) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        debug!(cols, rows, "terminal surface acquired");

        Ok(Self {
            out,
            cols,
            rows,
            buf: String::new(),
        })
    }

    /// Paint one progress row of cells at a 1-based terminal row.
    fn paint_bar_row(&mut self, row: u16, cells: &[BarCell], fill_color: &str) {
        self.buf.push_str(&format!("\x1b[{};1H", row));

        let mut current: &str = "";
        for cell in cells {
            let (color, ch) = match cell {
                BarCell::Filled => (fill_color, '█'),
                BarCell::Tick => (WHITE, '█'),
                BarCell::Empty => (DARK_GREY, '─'),
            };
            if color != current {
                self.buf.push_str(color);
                current = color;
            }
            self.buf.push(ch);
        }
        self.buf.push_str(RESET);
    }

    fn clip_row(&self) -> u16 {
        self.rows - 1
    }

    fn video_row(&self) -> u16 {
        self.rows
    }
}

impl PresentationSurface for TerminalSurface {
    fn frame_area(&self) -> (u32, u32) {
        (
            self.cols as u32,
            (self.rows - PROGRESS_ROWS) as u32 * 2,
        )
    }

    fn clear(&mut self) -> io::Result<()> {
        self.buf.push_str("\x1b[2J");
        Ok(())
    }

    fn blit_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let (area_w, area_h) = self.frame_area();
        let draw_w = frame.width.min(area_w);
        let draw_h = frame.height.min(area_h);
        let cell_rows = (draw_h + 1) / 2;

        for cy in 0..cell_rows {
            self.buf.push_str(&format!("\x1b[{};1H", cy + 1));

            let mut current: Option<((u8, u8, u8), (u8, u8, u8))> = None;
            for x in 0..draw_w {
                let top = frame.pixel(x, cy * 2);
                let bottom = if cy * 2 + 1 < draw_h {
                    frame.pixel(x, cy * 2 + 1)
                } else {
                    (0, 0, 0)
                };

                if current != Some((top, bottom)) {
                    self.buf.push_str(&format!(
                        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
                        top.0, top.1, top.2, bottom.0, bottom.1, bottom.2
                    ));
                    current = Some((top, bottom));
                }
                self.buf.push('▀');
            }
            self.buf.push_str(RESET);
        }
        Ok(())
    }

    fn draw_clip_progress(&mut self, fraction: f64) -> io::Result<()> {
        let cells = build_bar_cells(self.cols as usize, fraction, &[]);
        self.paint_bar_row(self.clip_row(), &cells, GREEN);
        Ok(())
    }

    fn draw_video_progress(
        &mut self,
        fraction: f64,
        ticks: &[f64],
        full_height: bool,
    ) -> io::Result<()> {
        let width = self.cols as usize;
        let cols = tick_columns(width, ticks);
        let cells = build_bar_cells(width, fraction, &cols);

        self.paint_bar_row(self.video_row(), &cells, RED);
        if full_height {
            let clip_row = self.clip_row();
            self.paint_bar_row(clip_row, &cells, RED);
        }
        Ok(())
    }

    fn draw_record_badge(&mut self) -> io::Result<()> {
        self.buf
            .push_str(&format!("\x1b[1;2H{}● REC{}", BRIGHT_RED, RESET));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.write_all(self.buf.as_bytes())?;
        self.out.flush()?;
        self.buf.clear();
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Best effort: show cursor, leave the alternate screen, cook the tty
        let _ = write!(self.out, "\x1b[?25h\x1b[?1049l");
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
        debug!("terminal surface released");
    }
}
