//! Key bindings per session mode.
//!
//! The core only speaks [`InputEvent`]; which key means what is decided
//! here. Recording and playback deliberately overlap: Space and Enter mark
//! a step while recording but advance a segment during playback.

use crate::player::input::InputEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingMode {
    Recording,
    Playback,
}

/// Translates key events into [`InputEvent`]s for one session mode.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    mode: BindingMode,
}

impl KeyBindings {
    /// Bindings for a recording session.
    pub fn recording() -> Self {
        Self {
            mode: BindingMode::Recording,
        }
    }

    /// Bindings for a playback session.
    pub fn playback() -> Self {
        Self {
            mode: BindingMode::Playback,
        }
    }

    /// Translate one key event, or `None` for unbound keys.
    pub fn map(&self, key: KeyEvent) -> Option<InputEvent> {
        // === Shared bindings ===
        match key.code {
            KeyCode::Char('q') => return Some(InputEvent::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(InputEvent::Quit)
            }
            KeyCode::Char('p') => return Some(InputEvent::PauseToggle),
            _ => {}
        }

        match self.mode {
            // === Recording: mark steps ===
            BindingMode::Recording => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => Some(InputEvent::MarkStep),
                _ => None,
            },

            // === Playback: segment navigation ===
            BindingMode::Playback => match key.code {
                KeyCode::Enter
                | KeyCode::Char(' ')
                | KeyCode::Right
                | KeyCode::Char('j')
                | KeyCode::Char('l') => Some(InputEvent::Advance),
                KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                    Some(InputEvent::Rewind)
                }
                KeyCode::Char('0') | KeyCode::Backspace => Some(InputEvent::Restart),
                _ => None,
            },
        }
    }
}
