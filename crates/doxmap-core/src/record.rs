use std::fmt;

use crate::layer::KeyPos;

/// Represents the transition of a physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Release = 0,
    Press = 1,
}

impl KeyEvent {
    /// Build from the host's `pressed` flag
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            KeyEvent::Press
        } else {
            KeyEvent::Release
        }
    }

    /// Returns true if this is a PRESS event
    pub fn is_pressed(self) -> bool {
        matches!(self, KeyEvent::Press)
    }

    /// Returns true if this is a RELEASE event
    pub fn is_released(self) -> bool {
        matches!(self, KeyEvent::Release)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Release => write!(f, "release"),
            KeyEvent::Press => write!(f, "press"),
        }
    }
}

/// A key transition as the host hands it to the user hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub pos: KeyPos,
    pub event: KeyEvent,
}

impl KeyRecord {
    pub fn new(pos: KeyPos, event: KeyEvent) -> Self {
        Self { pos, event }
    }

    pub fn pressed(&self) -> bool {
        self.event.is_pressed()
    }
}
