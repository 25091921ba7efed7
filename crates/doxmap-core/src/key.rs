// Doxmap Key Type
// Represents a single QMK basic keycode

use std::fmt;
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/key_codes.rs"));

/// Try to parse a key name to a key code.
///
/// Accepts the QMK spelling with or without the `KC_` prefix, in any case,
/// including the older aliases (`KC_DELT`, `KC_PSCREEN`, `KC_BSPACE`, ...).
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.trim().to_uppercase();
    let bare = upper.strip_prefix("KC_").unwrap_or(&upper);
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == bare)
        .map(|(_, code)| Key::from(*code))
}

/// Map a printable ASCII character to the key that types it on a US host
/// layout, and whether shift must be held.
pub fn ascii_to_key(c: char) -> Option<(Key, bool)> {
    let plain = |k: Key| Some((k, false));
    let shifted = |k: Key| Some((k, true));
    match c {
        'a'..='z' => plain(Key(Key::A.0 + (c as u16 - 'a' as u16))),
        'A'..='Z' => shifted(Key(Key::A.0 + (c as u16 - 'A' as u16))),
        '0' => plain(Key::N0),
        '1'..='9' => plain(Key(Key::N1.0 + (c as u16 - '1' as u16))),
        '!' => shifted(Key::N1),
        '@' => shifted(Key::N2),
        '#' => shifted(Key::N3),
        '$' => shifted(Key::N4),
        '%' => shifted(Key::N5),
        '^' => shifted(Key::N6),
        '&' => shifted(Key::N7),
        '*' => shifted(Key::N8),
        '(' => shifted(Key::N9),
        ')' => shifted(Key::N0),
        '-' => plain(Key::MINUS),
        '_' => shifted(Key::MINUS),
        '=' => plain(Key::EQUAL),
        '+' => shifted(Key::EQUAL),
        '[' => plain(Key::LBRC),
        '{' => shifted(Key::LBRC),
        ']' => plain(Key::RBRC),
        '}' => shifted(Key::RBRC),
        '\\' => plain(Key::BSLS),
        '|' => shifted(Key::BSLS),
        ';' => plain(Key::SCLN),
        ':' => shifted(Key::SCLN),
        '\'' => plain(Key::QUOT),
        '"' => shifted(Key::QUOT),
        '`' => plain(Key::GRAVE),
        '~' => shifted(Key::GRAVE),
        ',' => plain(Key::COMMA),
        '<' => shifted(Key::COMMA),
        '.' => plain(Key::DOT),
        '>' => shifted(Key::DOT),
        '/' => plain(Key::SLASH),
        '?' => shifted(Key::SLASH),
        ' ' => plain(Key::SPACE),
        '\n' => plain(Key::ENTER),
        '\t' => plain(Key::TAB),
        _ => None,
    }
}

impl Key {
    /// True for the eight HID modifier keys
    pub const fn is_modifier(self) -> bool {
        self.0 >= Key::LCTL.0 && self.0 <= Key::RGUI.0
    }

    /// True for the mouse movement, button, wheel and acceleration keys
    pub const fn is_mouse(self) -> bool {
        self.0 >= Key::MS_U.0 && self.0 <= Key::ACL2.0
    }
}
