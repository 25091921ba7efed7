// Doxmap Combo Type
// A key tapped while an ordered list of modifiers is held

use std::fmt;

use smallvec::SmallVec;

use crate::modifier::{Modifier, Mods};
use crate::output::{HostOp, OutputBatch};
use crate::Key;

/// Represents a key combination with an ordered list of modifiers.
///
/// Unlike [`Mods`], the order is kept: modifiers go down in list order and
/// come back up in reverse, which some host chord handlers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combo {
    modifiers: SmallVec<[Modifier; 4]>,
    key: Key,
}

impl Combo {
    /// Create a new Combo from modifiers and a key
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// Create a Combo from a single modifier and key
    pub fn from_single(modifier: Modifier, key: Key) -> Self {
        Self::new([modifier], key)
    }

    /// Create a Combo from a modifier set, lowest bit first
    pub fn from_mods(mods: Mods, key: Key) -> Self {
        Self::new(mods.modifiers(), key)
    }

    /// Get the modifiers for this combo
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Get the key for this combo
    pub fn key(&self) -> Key {
        self.key
    }

    /// Add a modifier to this combo, held inside the existing ones
    pub fn with_modifier(&self, modifier: Modifier) -> Self {
        let mut new_modifiers = self.modifiers.clone();
        new_modifiers.push(modifier);
        Self {
            modifiers: new_modifiers,
            key: self.key,
        }
    }

    /// The unordered modifier set
    pub fn mods(&self) -> Mods {
        self.modifiers.iter().copied().collect()
    }

    /// Modifier downs in order, key down, key up, modifier ups in reverse.
    pub fn tap_ops(&self) -> OutputBatch {
        let mut ops = OutputBatch::new();
        ops.extend(self.modifiers.iter().map(|m| HostOp::KeyDown(m.key())));
        ops.push(HostOp::KeyDown(self.key));
        ops.push(HostOp::KeyUp(self.key));
        ops.extend(self.modifiers.iter().rev().map(|m| HostOp::KeyUp(m.key())));
        ops
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}-", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_display() {
        let combo = Combo::new([Modifier::LGui, Modifier::LShift], Key::N4);
        assert_eq!(combo.to_string(), "LGui-LShift-4");
    }

    #[test]
    fn test_combo_tap_ops_nesting() {
        let combo = Combo::new([Modifier::LGui, Modifier::LShift], Key::N4);
        assert_eq!(
            combo.tap_ops().as_slice(),
            &[
                HostOp::KeyDown(Key::LGUI),
                HostOp::KeyDown(Key::LSFT),
                HostOp::KeyDown(Key::N4),
                HostOp::KeyUp(Key::N4),
                HostOp::KeyUp(Key::LSFT),
                HostOp::KeyUp(Key::LGUI),
            ]
        );
    }

    #[test]
    fn test_combo_order_is_significant() {
        let a = Combo::new([Modifier::LGui, Modifier::LShift], Key::N4);
        let b = Combo::new([Modifier::LShift, Modifier::LGui], Key::N4);
        assert_ne!(a, b);
        assert_eq!(a.mods(), b.mods());
    }

    #[test]
    fn test_combo_without_modifiers() {
        let combo = Combo::new([], Key::PSCR);
        assert_eq!(
            combo.tap_ops().as_slice(),
            &[HostOp::KeyDown(Key::PSCR), HostOp::KeyUp(Key::PSCR)]
        );
    }

    #[test]
    fn test_combo_with_modifier() {
        let combo = Combo::from_single(Modifier::LGui, Key::LEFT).with_modifier(Modifier::LShift);
        assert_eq!(combo.modifiers(), &[Modifier::LGui, Modifier::LShift]);
        assert_eq!(Combo::from_mods(Mods::LCTRL | Mods::LGUI, Key::A).modifiers().len(), 2);
    }
}
