// Doxmap Modifier System
// The eight HID modifiers and the modifier sets bound in the layout table

use bitflags::bitflags;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Key;

/// Represents a single keyboard modifier, such as Shift or Gui (Cmd)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(to_string = "LCtrl", serialize = "LCTL")]
    LCtrl,
    #[strum(to_string = "LShift", serialize = "LSFT")]
    LShift,
    #[strum(to_string = "LAlt", serialize = "LOpt")]
    LAlt,
    #[strum(to_string = "LGui", serialize = "LCmd", serialize = "LWin")]
    LGui,
    #[strum(to_string = "RCtrl", serialize = "RCTL")]
    RCtrl,
    #[strum(to_string = "RShift", serialize = "RSFT")]
    RShift,
    #[strum(to_string = "RAlt", serialize = "ROpt")]
    RAlt,
    #[strum(to_string = "RGui", serialize = "RCmd", serialize = "RWin")]
    RGui,
}

impl Modifier {
    /// The key that represents this modifier on the wire
    pub const fn key(self) -> Key {
        match self {
            Modifier::LCtrl => Key::LCTL,
            Modifier::LShift => Key::LSFT,
            Modifier::LAlt => Key::LALT,
            Modifier::LGui => Key::LGUI,
            Modifier::RCtrl => Key::RCTL,
            Modifier::RShift => Key::RSFT,
            Modifier::RAlt => Key::RALT,
            Modifier::RGui => Key::RGUI,
        }
    }

    /// Get modifier by key code
    pub const fn from_key(key: Key) -> Option<Modifier> {
        match key {
            Key::LCTL => Some(Modifier::LCtrl),
            Key::LSFT => Some(Modifier::LShift),
            Key::LALT => Some(Modifier::LAlt),
            Key::LGUI => Some(Modifier::LGui),
            Key::RCTL => Some(Modifier::RCtrl),
            Key::RSFT => Some(Modifier::RShift),
            Key::RALT => Some(Modifier::RAlt),
            Key::RGUI => Some(Modifier::RGui),
            _ => None,
        }
    }

    /// The single-bit set for this modifier
    pub const fn bit(self) -> Mods {
        match self {
            Modifier::LCtrl => Mods::LCTRL,
            Modifier::LShift => Mods::LSHIFT,
            Modifier::LAlt => Mods::LALT,
            Modifier::LGui => Mods::LGUI,
            Modifier::RCtrl => Mods::RCTRL,
            Modifier::RShift => Mods::RSHIFT,
            Modifier::RAlt => Mods::RALT,
            Modifier::RGui => Mods::RGUI,
        }
    }

    /// QMK wrapper name used for modded keys, e.g. `LSFT` in `LSFT(KC_DEL)`
    pub const fn qmk_wrapper(self) -> &'static str {
        match self {
            Modifier::LCtrl => "LCTL",
            Modifier::LShift => "LSFT",
            Modifier::LAlt => "LALT",
            Modifier::LGui => "LGUI",
            Modifier::RCtrl => "RCTL",
            Modifier::RShift => "RSFT",
            Modifier::RAlt => "RALT",
            Modifier::RGui => "RGUI",
        }
    }
}

bitflags! {
    /// A set of modifiers, laid out like the HID report modifier byte.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
    pub struct Mods: u8 {
        const LCTRL = 0b0000_0001;
        const LSHIFT = 0b0000_0010;
        const LALT = 0b0000_0100;
        const LGUI = 0b0000_1000;
        const RCTRL = 0b0001_0000;
        const RSHIFT = 0b0010_0000;
        const RALT = 0b0100_0000;
        const RGUI = 0b1000_0000;

        /// Ctrl+Shift+Alt
        const MEH = Self::LCTRL.bits() | Self::LSHIFT.bits() | Self::LALT.bits();
        /// Ctrl+Shift+Alt+Gui
        const HYPR = Self::MEH.bits() | Self::LGUI.bits();
    }
}

impl Mods {
    const ORDER: [Modifier; 8] = [
        Modifier::LCtrl,
        Modifier::LShift,
        Modifier::LAlt,
        Modifier::LGui,
        Modifier::RCtrl,
        Modifier::RShift,
        Modifier::RAlt,
        Modifier::RGui,
    ];

    /// The modifiers in this set, lowest bit first
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> {
        Self::ORDER.into_iter().filter(move |m| self.contains(m.bit()))
    }

    /// The modifier keys in this set, lowest bit first
    pub fn keys(self) -> impl Iterator<Item = Key> {
        self.modifiers().map(Modifier::key)
    }
}

impl From<Modifier> for Mods {
    fn from(modifier: Modifier) -> Self {
        modifier.bit()
    }
}

impl FromIterator<Modifier> for Mods {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        iter.into_iter().fold(Mods::empty(), |acc, m| acc | m.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_modifier_from_alias() {
        assert_eq!(Modifier::from_str("LCtrl"), Ok(Modifier::LCtrl));
        assert_eq!(Modifier::from_str("lsft"), Ok(Modifier::LShift));
        assert_eq!(Modifier::from_str("LCmd"), Ok(Modifier::LGui));
        assert!(Modifier::from_str("Hyper").is_err());
    }

    #[test]
    fn test_modifier_key_round_trip() {
        for modifier in Modifier::iter() {
            assert!(modifier.key().is_modifier());
            assert_eq!(Modifier::from_key(modifier.key()), Some(modifier));
        }
        assert_eq!(Modifier::from_key(Key::A), None);
    }

    #[test]
    fn test_mods_order() {
        let mods = Mods::LGUI | Mods::LCTRL;
        let keys: Vec<Key> = mods.keys().collect();
        assert_eq!(keys, vec![Key::LCTL, Key::LGUI]);
    }

    #[test]
    fn test_mods_presets() {
        assert_eq!(Mods::MEH.modifiers().count(), 3);
        assert_eq!(Mods::HYPR.modifiers().count(), 4);
        assert!(Mods::HYPR.contains(Mods::LGUI));
        assert!(!Mods::MEH.contains(Mods::LGUI));
    }

    #[test]
    fn test_mods_from_iter() {
        let mods: Mods = [Modifier::LShift, Modifier::LAlt].into_iter().collect();
        assert_eq!(mods, Mods::LSHIFT | Mods::LALT);
    }
}
