// Doxmap Key Actions
// The value bound to one (layer, position) cell and its QMK token syntax

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::key::key_from_name;
use crate::layer::Layer;
use crate::modifier::{Modifier, Mods};
use crate::Key;

/// First keycode available to user keymaps.
pub const SAFE_RANGE: u16 = 0x7E00;

/// Keymap-defined keycodes resolved by the dispatcher.
///
/// `SAFE_RANGE` itself is the reserved placeholder and is never dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[repr(u16)]
pub enum CustomKeycode {
    /// Reset persistent settings to defaults
    #[strum(to_string = "EPRM")]
    Eprm = SAFE_RANGE + 1,
    /// Type the keyboard identification string
    #[strum(to_string = "VRSN")]
    Version = SAFE_RANGE + 2,
    /// Put the underglow into solid mode
    #[strum(to_string = "RGB_SLD")]
    RgbSolid = SAFE_RANGE + 3,
    /// Tap Print Screen
    #[strum(to_string = "ALT_SCRN")]
    AltScreen = SAFE_RANGE + 4,
    /// Gui+Shift+4 region screenshot
    #[strum(to_string = "MAC_SCREENSHOT")]
    MacScreenshot = SAFE_RANGE + 5,
    /// Gui+Left, start of line
    #[strum(to_string = "MAC_HOME")]
    MacHome = SAFE_RANGE + 6,
    /// Gui+Right, end of line
    #[strum(to_string = "MAC_END")]
    MacEnd = SAFE_RANGE + 7,
}

impl CustomKeycode {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::iter().find(|c| c.code() == code)
    }
}

/// Ids handed to the legacy macro hook through `M(id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[repr(u8)]
pub enum MacroId {
    #[strum(to_string = "0")]
    Version = 0,
    #[strum(to_string = "1")]
    Eprm = 1,
    /// Copy on a Dvorak host: Gui + the QWERTY position of C
    #[strum(to_string = "CMD_C")]
    CmdC = 123,
    /// Paste on a Dvorak host: Gui + the QWERTY position of V
    #[strum(to_string = "CMD_V")]
    CmdV = 124,
    #[strum(to_string = "CMD_LEFT")]
    CmdLeft = 125,
    #[strum(to_string = "CMD_RIGHT")]
    CmdRight = 126,
}

impl MacroId {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::iter().find(|m| m.id() == id)
    }
}

/// Underglow keycodes. These are handled by the host's lighting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum RgbCommand {
    #[strum(to_string = "RGB_TOG")]
    Toggle,
    #[strum(to_string = "RGB_MOD")]
    ModeForward,
    #[strum(to_string = "RGB_RMOD")]
    ModeReverse,
    #[strum(to_string = "RGB_HUI")]
    HueUp,
    #[strum(to_string = "RGB_HUD")]
    HueDown,
    #[strum(to_string = "RGB_SAI")]
    SatUp,
    #[strum(to_string = "RGB_SAD")]
    SatDown,
    #[strum(to_string = "RGB_VAI")]
    ValUp,
    #[strum(to_string = "RGB_VAD")]
    ValDown,
}

/// What a single key position does on one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Does nothing
    No,
    /// Falls through to the next active layer below
    Transparent,
    /// A plain keycode
    Key(Key),
    /// A keycode sent with modifiers held, e.g. `LSFT(KC_DEL)` or `KC_EXLM`
    Modded(Mods, Key),
    /// Modifiers when held, the key when tapped
    ModTap(Mods, Key),
    /// Layer while held, the key when tapped
    LayerTap(Layer, Key),
    /// Layer only while held
    Momentary(Layer),
    /// Resolved by the custom keycode dispatcher
    Custom(CustomKeycode),
    /// Resolved by the macro hook
    Macro(MacroId),
    /// Underglow control
    Rgb(RgbCommand),
}

/// Shorthands that QMK defines as a shifted base key.
const SHIFTED_ALIASES: &[(&str, Key)] = &[
    ("EXLM", Key::N1),
    ("AT", Key::N2),
    ("HASH", Key::N3),
    ("DLR", Key::N4),
    ("PERC", Key::N5),
    ("CIRC", Key::N6),
    ("AMPR", Key::N7),
    ("ASTR", Key::N8),
    ("LPRN", Key::N9),
    ("RPRN", Key::N0),
    ("UNDS", Key::MINUS),
    ("PLUS", Key::EQUAL),
    ("LCBR", Key::LBRC),
    ("RCBR", Key::RBRC),
    ("PIPE", Key::BSLS),
    ("COLN", Key::SCLN),
    ("DQUO", Key::QUOT),
    ("TILD", Key::GRAVE),
    ("LABK", Key::COMMA),
    ("RABK", Key::DOT),
    ("QUES", Key::SLASH),
];

/// Named mod-tap wrappers.
const MOD_TAPS: &[(&str, Mods)] = &[
    ("CTL_T", Mods::LCTRL),
    ("SFT_T", Mods::LSHIFT),
    ("ALT_T", Mods::LALT),
    ("GUI_T", Mods::LGUI),
    ("MEH_T", Mods::MEH),
    ("ALL_T", Mods::HYPR),
];

impl KeyAction {
    /// The key a tap of this action sends, if it is key-like.
    pub fn tap_key(self) -> Option<Key> {
        match self {
            KeyAction::Key(key)
            | KeyAction::Modded(_, key)
            | KeyAction::ModTap(_, key)
            | KeyAction::LayerTap(_, key) => Some(key),
            _ => None,
        }
    }

    /// The layer this action switches to while held, if any.
    pub fn target_layer(self) -> Option<Layer> {
        match self {
            KeyAction::Momentary(layer) | KeyAction::LayerTap(layer, _) => Some(layer),
            _ => None,
        }
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, KeyAction::Transparent)
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KeyAction::No => write!(f, "KC_NO"),
            KeyAction::Transparent => write!(f, "KC_TRNS"),
            KeyAction::Key(key) => write!(f, "KC_{}", key),
            KeyAction::Modded(mods, key) => {
                if mods == Mods::LSHIFT {
                    if let Some((alias, _)) = SHIFTED_ALIASES.iter().find(|(_, k)| *k == key) {
                        return write!(f, "KC_{}", alias);
                    }
                }
                let wrappers: Vec<Modifier> = mods.modifiers().collect();
                for modifier in &wrappers {
                    write!(f, "{}(", modifier.qmk_wrapper())?;
                }
                write!(f, "KC_{}", key)?;
                for _ in &wrappers {
                    write!(f, ")")?;
                }
                Ok(())
            }
            KeyAction::ModTap(mods, key) => match MOD_TAPS.iter().find(|(_, m)| *m == mods) {
                Some((name, _)) => write!(f, "{}(KC_{})", name, key),
                None => write!(f, "MT(0x{:02X},KC_{})", mods.bits(), key),
            },
            KeyAction::LayerTap(layer, key) => write!(f, "LT({},KC_{})", layer, key),
            KeyAction::Momentary(layer) => write!(f, "MO({})", layer),
            KeyAction::Custom(custom) => write!(f, "{}", custom),
            KeyAction::Macro(id) => write!(f, "M({})", id),
            KeyAction::Rgb(rgb) => write!(f, "{}", rgb),
        }
    }
}

/// Errors from parsing a QMK action token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("malformed action token: '{0}'")]
    Malformed(String),

    #[error("unknown key: '{0}'")]
    UnknownKey(String),

    #[error("unknown layer: '{0}'")]
    UnknownLayer(String),

    #[error("unknown macro id: '{0}'")]
    UnknownMacro(String),

    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z_0-9]*)\s*(?:\(\s*(.*?)\s*\))?\s*$")
            .expect("token pattern is valid")
    })
}

/// Split call arguments on commas that are not nested inside parentheses.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn expect_args<'a>(
    name: &str,
    args: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, ActionParseError> {
    let parts = split_args(args);
    if parts.len() != expected {
        return Err(ActionParseError::Arity {
            name: name.to_string(),
            expected,
            got: parts.len(),
        });
    }
    Ok(parts)
}

fn parse_layer(s: &str) -> Result<Layer, ActionParseError> {
    if let Ok(index) = s.parse::<usize>() {
        return Layer::from_index(index).ok_or_else(|| ActionParseError::UnknownLayer(s.to_string()));
    }
    Layer::from_str(s).map_err(|_| ActionParseError::UnknownLayer(s.to_string()))
}

fn parse_key(s: &str) -> Result<Key, ActionParseError> {
    key_from_name(s).ok_or_else(|| ActionParseError::UnknownKey(s.to_string()))
}

fn parse_mods_arg(s: &str) -> Result<Mods, ActionParseError> {
    let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    bits.map(Mods::from_bits_truncate)
        .map_err(|_| ActionParseError::Malformed(s.to_string()))
}

fn parse_bare(token: &str) -> Result<KeyAction, ActionParseError> {
    match token {
        "KC_TRNS" | "KC_TRANSPARENT" | "_______" => return Ok(KeyAction::Transparent),
        "KC_NO" | "XXXXXXX" => return Ok(KeyAction::No),
        _ => {}
    }
    if let Ok(custom) = CustomKeycode::from_str(token) {
        return Ok(KeyAction::Custom(custom));
    }
    if let Ok(rgb) = RgbCommand::from_str(token) {
        return Ok(KeyAction::Rgb(rgb));
    }
    let bare = token.strip_prefix("KC_").unwrap_or(token);
    if let Some((_, key)) = SHIFTED_ALIASES.iter().find(|(alias, _)| *alias == bare) {
        return Ok(KeyAction::Modded(Mods::LSHIFT, *key));
    }
    key_from_name(token)
        .map(KeyAction::Key)
        .ok_or_else(|| ActionParseError::UnknownAction(token.to_string()))
}

fn parse_call(name: &str, args: &str) -> Result<KeyAction, ActionParseError> {
    match name {
        "MO" => {
            let parts = expect_args(name, args, 1)?;
            Ok(KeyAction::Momentary(parse_layer(parts[0])?))
        }
        "LT" => {
            let parts = expect_args(name, args, 2)?;
            Ok(KeyAction::LayerTap(parse_layer(parts[0])?, parse_key(parts[1])?))
        }
        "M" => {
            let parts = expect_args(name, args, 1)?;
            let arg = parts[0].to_uppercase();
            MacroId::from_str(&arg)
                .ok()
                .or_else(|| arg.parse::<u8>().ok().and_then(MacroId::from_id))
                .map(KeyAction::Macro)
                .ok_or(ActionParseError::UnknownMacro(arg))
        }
        "MT" => {
            let parts = expect_args(name, args, 2)?;
            Ok(KeyAction::ModTap(parse_mods_arg(parts[0])?, parse_key(parts[1])?))
        }
        _ => {
            if let Some((_, mods)) = MOD_TAPS.iter().find(|(n, _)| *n == name) {
                let parts = expect_args(name, args, 1)?;
                return Ok(KeyAction::ModTap(*mods, parse_key(parts[0])?));
            }
            let wrapper = Modifier::iter()
                .find(|m| m.qmk_wrapper() == name)
                .ok_or_else(|| ActionParseError::UnknownAction(name.to_string()))?;
            let parts = expect_args(name, args, 1)?;
            match args_to_action(parts[0])? {
                KeyAction::Key(key) => Ok(KeyAction::Modded(wrapper.bit(), key)),
                KeyAction::Modded(mods, key) => Ok(KeyAction::Modded(mods | wrapper.bit(), key)),
                KeyAction::No => Ok(KeyAction::Modded(wrapper.bit(), Key::NO)),
                _ => Err(ActionParseError::Malformed(format!("{}({})", name, args))),
            }
        }
    }
}

fn args_to_action(token: &str) -> Result<KeyAction, ActionParseError> {
    let caps = token_regex()
        .captures(token)
        .ok_or_else(|| ActionParseError::Malformed(token.to_string()))?;
    let head = caps[1].to_uppercase();
    match caps.get(2) {
        Some(args) => parse_call(&head, args.as_str()),
        None => parse_bare(&head),
    }
}

impl FromStr for KeyAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        args_to_action(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_keycode_codes() {
        assert_eq!(CustomKeycode::Eprm.code(), SAFE_RANGE + 1);
        assert_eq!(CustomKeycode::from_code(SAFE_RANGE + 5), Some(CustomKeycode::MacScreenshot));
        assert_eq!(CustomKeycode::from_code(SAFE_RANGE), None);
        assert_eq!(CustomKeycode::from_code(0x04), None);
    }

    #[test]
    fn test_macro_ids() {
        assert_eq!(MacroId::CmdC.id(), 123);
        assert_eq!(MacroId::from_id(124), Some(MacroId::CmdV));
        assert_eq!(MacroId::from_id(2), None);
    }

    #[test]
    fn test_display_tokens() {
        assert_eq!(KeyAction::Transparent.to_string(), "KC_TRNS");
        assert_eq!(KeyAction::Key(Key::ESC).to_string(), "KC_ESC");
        assert_eq!(KeyAction::Modded(Mods::LSHIFT, Key::N1).to_string(), "KC_EXLM");
        assert_eq!(KeyAction::Modded(Mods::LSHIFT, Key::DELETE).to_string(), "LSFT(KC_DEL)");
        assert_eq!(KeyAction::Modded(Mods::LALT, Key::LSFT).to_string(), "LALT(KC_LSFT)");
        assert_eq!(
            KeyAction::Modded(Mods::LCTRL | Mods::LSHIFT, Key::A).to_string(),
            "LCTL(LSFT(KC_A))"
        );
        assert_eq!(KeyAction::ModTap(Mods::LALT, Key::A).to_string(), "ALT_T(KC_A)");
        assert_eq!(KeyAction::ModTap(Mods::HYPR, Key::NO).to_string(), "ALL_T(KC_NO)");
        assert_eq!(KeyAction::ModTap(Mods::RALT, Key::A).to_string(), "MT(0x40,KC_A)");
        assert_eq!(
            KeyAction::LayerTap(Layer::Navigation, Key::K).to_string(),
            "LT(NAVI,KC_K)"
        );
        assert_eq!(KeyAction::Momentary(Layer::Symbols).to_string(), "MO(SYMB)");
        assert_eq!(KeyAction::Macro(MacroId::CmdC).to_string(), "M(CMD_C)");
        assert_eq!(KeyAction::Custom(CustomKeycode::Version).to_string(), "VRSN");
        assert_eq!(KeyAction::Rgb(RgbCommand::ValDown).to_string(), "RGB_VAD");
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("KC_TRNS".parse(), Ok(KeyAction::Transparent));
        assert_eq!("_______".parse(), Ok(KeyAction::Transparent));
        assert_eq!("KC_DELT".parse(), Ok(KeyAction::Key(Key::DELETE)));
        assert_eq!("KC_TILD".parse(), Ok(KeyAction::Modded(Mods::LSHIFT, Key::GRAVE)));
        assert_eq!(
            "LT(NAVI, KC_K)".parse(),
            Ok(KeyAction::LayerTap(Layer::Navigation, Key::K))
        );
        assert_eq!("LT(3,KC_K)".parse(), Ok(KeyAction::LayerTap(Layer::Navigation, Key::K)));
        assert_eq!("MO(SYMB)".parse(), Ok(KeyAction::Momentary(Layer::Symbols)));
        assert_eq!("gui_t(kc_quot)".parse(), Ok(KeyAction::ModTap(Mods::LGUI, Key::QUOT)));
        assert_eq!("MEH_T(KC_NO)".parse(), Ok(KeyAction::ModTap(Mods::MEH, Key::NO)));
        assert_eq!("M(CMD_V)".parse(), Ok(KeyAction::Macro(MacroId::CmdV)));
        assert_eq!("M(0)".parse(), Ok(KeyAction::Macro(MacroId::Version)));
        assert_eq!(
            "LCTL(LSFT(KC_A))".parse(),
            Ok(KeyAction::Modded(Mods::LCTRL | Mods::LSHIFT, Key::A))
        );
        assert_eq!("MT(0x40,KC_A)".parse(), Ok(KeyAction::ModTap(Mods::RALT, Key::A)));
        assert_eq!("MAC_SCREENSHOT".parse(), Ok(KeyAction::Custom(CustomKeycode::MacScreenshot)));
        assert_eq!("RGB_TOG".parse(), Ok(KeyAction::Rgb(RgbCommand::Toggle)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "KC_BOGUS".parse::<KeyAction>(),
            Err(ActionParseError::UnknownAction("KC_BOGUS".to_string()))
        );
        assert_eq!(
            "MO(FN)".parse::<KeyAction>(),
            Err(ActionParseError::UnknownLayer("FN".to_string()))
        );
        assert!(matches!(
            "LT(NAVI)".parse::<KeyAction>(),
            Err(ActionParseError::Arity { expected: 2, got: 1, .. })
        ));
        assert!(matches!("M(9)".parse::<KeyAction>(), Err(ActionParseError::UnknownMacro(_))));
        assert!(matches!("(KC_A".parse::<KeyAction>(), Err(ActionParseError::Malformed(_))));
    }

    #[test]
    fn test_tap_key_and_target_layer() {
        assert_eq!(KeyAction::LayerTap(Layer::Media, Key::L).tap_key(), Some(Key::L));
        assert_eq!(KeyAction::LayerTap(Layer::Media, Key::L).target_layer(), Some(Layer::Media));
        assert_eq!(KeyAction::Momentary(Layer::Symbols).tap_key(), None);
        assert_eq!(KeyAction::Custom(CustomKeycode::Eprm).tap_key(), None);
    }
}
