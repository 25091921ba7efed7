// Doxmap Pressed Key State
// HashSet-based tracking of the keycodes a host currently holds

use std::collections::HashSet;

use crate::Key;

/// Tracks registered keys with O(1) lookup
#[derive(Debug, Clone, Default)]
pub struct PressedKeyState {
    pressed: HashSet<Key>,
}

impl PressedKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key held. Returns false if it already was.
    pub fn add(&mut self, key: Key) -> bool {
        self.pressed.insert(key)
    }

    /// Mark a key released. Returns false if it was not held.
    pub fn remove(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Held modifier keys, in HID order
    pub fn modifiers(&self) -> Vec<Key> {
        let mut mods: Vec<Key> = self.pressed.iter().copied().filter(|k| k.is_modifier()).collect();
        mods.sort();
        mods
    }

    /// All held keys, sorted by code
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.pressed.iter().copied().collect();
        keys.sort();
        keys
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}
