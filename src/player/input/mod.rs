//! Input handling for playback and recording sessions.
//!
//! Terminal keys arrive via crossterm and translate through mode-specific
//! [`KeyBindings`] into the small [`InputEvent`] vocabulary the engine
//! understands. Polling never blocks; an empty poll is a normal answer and
//! means the current frame plays on undisturbed.

mod keys;

pub use keys::KeyBindings;

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// What the user asked for, independent of which key said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// End the session
    Quit,
    /// Toggle pause
    PauseToggle,
    /// Move on to the next segment
    Advance,
    /// Go back one segment
    Rewind,
    /// Replay the current segment from its start
    Restart,
    /// Record a step at the current position
    MarkStep,
}

/// Source of user input events.
pub trait InputSource {
    /// Drain all pending events without blocking.
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;

    /// Swap the active key bindings.
    ///
    /// The engine calls this at the start of every pass with the bindings
    /// its session mode wants, so the same keys can mean different things
    /// while recording and during playback. Sources without a key map
    /// ignore it.
    fn set_bindings(&mut self, bindings: KeyBindings) {
        let _ = bindings;
    }
}

/// Keyboard input from the terminal.
///
/// Requires raw mode (the surface enables it): Ctrl-C arrives here as a key
/// event instead of a signal, so quitting goes through the same path as
/// `q`.
pub struct TerminalInput {
    bindings: KeyBindings,
}

impl TerminalInput {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(ev) = self.bindings.map(key) {
                    events.push(ev);
                }
            }
        }
        Ok(events)
    }

    fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }
}
