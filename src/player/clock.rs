//! Frame pacing.
//!
//! The sync engine talks to time through one small seam: a clock that
//! blocks until the next frame slot and reports how much wall time the last
//! frame really took. Overruns come back as elapsed values larger than the
//! frame interval, which is exactly the drift signal the engine accumulates.
//! Tests substitute a scripted clock and never sleep.

use std::thread;
use std::time::{Duration, Instant};

/// Paces a playback pass and measures real elapsed time.
pub trait FrameClock {
    /// Begin a new pass at `fps`, resetting the tick reference.
    fn start(&mut self, fps: f64);

    /// Block until one frame interval has passed since the previous tick,
    /// then return the real elapsed milliseconds. When the caller overran
    /// the interval, no waiting happens and the full overrun is reported.
    fn wait_for_next_frame(&mut self) -> f64;

    /// Milliseconds since the pass started.
    fn now(&self) -> f64;
}

/// Wall-time clock for real playback.
#[derive(Debug)]
pub struct WallClock {
    interval: Duration,
    origin: Instant,
    last_tick: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            interval: Duration::ZERO,
            origin: now,
            last_tick: now,
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn start(&mut self, fps: f64) {
        self.interval = if fps > 0.0 {
            Duration::from_secs_f64(1.0 / fps)
        } else {
            Duration::ZERO
        };
        let now = Instant::now();
        self.origin = now;
        self.last_tick = now;
    }

    fn wait_for_next_frame(&mut self) -> f64 {
        let target = self.last_tick + self.interval;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
        let after = Instant::now();
        let elapsed = after - self.last_tick;
        self.last_tick = after;
        elapsed.as_secs_f64() * 1000.0
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
