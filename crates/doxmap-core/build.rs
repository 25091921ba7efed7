use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// (associated const, code, names). The first name is the display name, the
/// rest are accepted aliases when parsing.
const KEYS: &[(&str, u16, &[&str])] = &[
    ("NO", 0x00, &["NO"]),
    ("A", 0x04, &["A"]),
    ("B", 0x05, &["B"]),
    ("C", 0x06, &["C"]),
    ("D", 0x07, &["D"]),
    ("E", 0x08, &["E"]),
    ("F", 0x09, &["F"]),
    ("G", 0x0A, &["G"]),
    ("H", 0x0B, &["H"]),
    ("I", 0x0C, &["I"]),
    ("J", 0x0D, &["J"]),
    ("K", 0x0E, &["K"]),
    ("L", 0x0F, &["L"]),
    ("M", 0x10, &["M"]),
    ("N", 0x11, &["N"]),
    ("O", 0x12, &["O"]),
    ("P", 0x13, &["P"]),
    ("Q", 0x14, &["Q"]),
    ("R", 0x15, &["R"]),
    ("S", 0x16, &["S"]),
    ("T", 0x17, &["T"]),
    ("U", 0x18, &["U"]),
    ("V", 0x19, &["V"]),
    ("W", 0x1A, &["W"]),
    ("X", 0x1B, &["X"]),
    ("Y", 0x1C, &["Y"]),
    ("Z", 0x1D, &["Z"]),
    ("N1", 0x1E, &["1"]),
    ("N2", 0x1F, &["2"]),
    ("N3", 0x20, &["3"]),
    ("N4", 0x21, &["4"]),
    ("N5", 0x22, &["5"]),
    ("N6", 0x23, &["6"]),
    ("N7", 0x24, &["7"]),
    ("N8", 0x25, &["8"]),
    ("N9", 0x26, &["9"]),
    ("N0", 0x27, &["0"]),
    ("ENTER", 0x28, &["ENT", "ENTER"]),
    ("ESC", 0x29, &["ESC", "ESCAPE"]),
    ("BSPC", 0x2A, &["BSPC", "BSPACE", "BACKSPACE"]),
    ("TAB", 0x2B, &["TAB"]),
    ("SPACE", 0x2C, &["SPC", "SPACE"]),
    ("MINUS", 0x2D, &["MINS", "MINUS"]),
    ("EQUAL", 0x2E, &["EQL", "EQUAL"]),
    ("LBRC", 0x2F, &["LBRC", "LBRACKET", "LEFT_BRACKET"]),
    ("RBRC", 0x30, &["RBRC", "RBRACKET", "RIGHT_BRACKET"]),
    ("BSLS", 0x31, &["BSLS", "BSLASH", "BACKSLASH"]),
    ("SCLN", 0x33, &["SCLN", "SCOLON", "SEMICOLON"]),
    ("QUOT", 0x34, &["QUOT", "QUOTE"]),
    ("GRAVE", 0x35, &["GRV", "GRAVE"]),
    ("COMMA", 0x36, &["COMM", "COMMA"]),
    ("DOT", 0x37, &["DOT"]),
    ("SLASH", 0x38, &["SLSH", "SLASH"]),
    ("CAPS", 0x39, &["CAPS", "CAPSLOCK"]),
    ("F1", 0x3A, &["F1"]),
    ("F2", 0x3B, &["F2"]),
    ("F3", 0x3C, &["F3"]),
    ("F4", 0x3D, &["F4"]),
    ("F5", 0x3E, &["F5"]),
    ("F6", 0x3F, &["F6"]),
    ("F7", 0x40, &["F7"]),
    ("F8", 0x41, &["F8"]),
    ("F9", 0x42, &["F9"]),
    ("F10", 0x43, &["F10"]),
    ("F11", 0x44, &["F11"]),
    ("F12", 0x45, &["F12"]),
    ("PSCR", 0x46, &["PSCR", "PSCREEN", "PRINT_SCREEN"]),
    ("SCROLL_LOCK", 0x47, &["SLCK", "SCROLLLOCK"]),
    ("PAUSE", 0x48, &["PAUS", "PAUSE"]),
    ("INSERT", 0x49, &["INS", "INSERT"]),
    ("HOME", 0x4A, &["HOME"]),
    ("PGUP", 0x4B, &["PGUP"]),
    ("DELETE", 0x4C, &["DEL", "DELT", "DELETE"]),
    ("END", 0x4D, &["END"]),
    ("PGDN", 0x4E, &["PGDN", "PGDOWN"]),
    ("RIGHT", 0x4F, &["RGHT", "RIGHT"]),
    ("LEFT", 0x50, &["LEFT"]),
    ("DOWN", 0x51, &["DOWN"]),
    ("UP", 0x52, &["UP"]),
    ("APP", 0x65, &["APP", "APPLICATION"]),
    ("MUTE", 0xA8, &["MUTE", "AUDIO_MUTE"]),
    ("VOLU", 0xA9, &["VOLU", "AUDIO_VOL_UP"]),
    ("VOLD", 0xAA, &["VOLD", "AUDIO_VOL_DOWN"]),
    ("MNXT", 0xAB, &["MNXT", "MEDIA_NEXT_TRACK"]),
    ("MPRV", 0xAC, &["MPRV", "MEDIA_PREV_TRACK"]),
    ("MSTP", 0xAD, &["MSTP", "MEDIA_STOP"]),
    ("MPLY", 0xAE, &["MPLY", "MEDIA_PLAY_PAUSE"]),
    ("WBAK", 0xB6, &["WBAK", "WWW_BACK"]),
    ("LCTL", 0xE0, &["LCTL", "LCTRL"]),
    ("LSFT", 0xE1, &["LSFT", "LSHIFT"]),
    ("LALT", 0xE2, &["LALT"]),
    ("LGUI", 0xE3, &["LGUI"]),
    ("RCTL", 0xE4, &["RCTL", "RCTRL"]),
    ("RSFT", 0xE5, &["RSFT", "RSHIFT"]),
    ("RALT", 0xE6, &["RALT"]),
    ("RGUI", 0xE7, &["RGUI"]),
    ("MS_U", 0xF0, &["MS_U", "MS_UP"]),
    ("MS_D", 0xF1, &["MS_D", "MS_DOWN"]),
    ("MS_L", 0xF2, &["MS_L", "MS_LEFT"]),
    ("MS_R", 0xF3, &["MS_R", "MS_RIGHT"]),
    ("BTN1", 0xF4, &["BTN1"]),
    ("BTN2", 0xF5, &["BTN2"]),
    ("BTN3", 0xF6, &["BTN3"]),
    ("WH_U", 0xF9, &["WH_U"]),
    ("WH_D", 0xFA, &["WH_D"]),
    ("WH_L", 0xFB, &["WH_L"]),
    ("WH_R", 0xFC, &["WH_R"]),
    ("ACL0", 0xFD, &["ACL0"]),
    ("ACL1", 0xFE, &["ACL1"]),
    ("ACL2", 0xFF, &["ACL2"]),
];

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_codes.rs");
    let mut f = File::create(&dest_path).unwrap();

    // Generate the Key newtype wrapper
    writeln!(
        f,
        r#"
/// Represents a single QMK basic keycode.
///
/// This is a newtype wrapper around u16 for type safety. Keyboard-page
/// values are HID usage ids; media, browser and mouse keys use QMK's own
/// numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {{
    /// Get the raw numeric code value
    pub const fn code(self) -> u16 {{
        self.0
    }}

    /// Get the QMK name of this key, without the `KC_` prefix
    pub fn name(self) -> &'static str {{
        key_name(self.0)
    }}
}}

impl From<u16> for Key {{
    fn from(code: u16) -> Self {{
        Key(code)
    }}
}}

impl From<Key> for u16 {{
    fn from(key: Key) -> Self {{
        key.0
    }}
}}

impl fmt::Display for Key {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}

impl FromStr for Key {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        key_from_name(s).ok_or_else(|| format!("Unknown key: {{}}", s))
    }}
}}
"#
    )
    .unwrap();

    writeln!(f, "#[allow(dead_code)]\nimpl Key {{").unwrap();
    for (ident, code, _) in KEYS {
        writeln!(f, "    pub const {}: Key = Key(0x{:02X});", ident, code).unwrap();
    }
    writeln!(f, "}}\n").unwrap();

    writeln!(f, "/// Display name for a key code").unwrap();
    writeln!(f, "pub fn key_name(code: u16) -> &'static str {{").unwrap();
    writeln!(f, "    match code {{").unwrap();
    for (_, code, names) in KEYS {
        writeln!(f, "        0x{:02X} => \"{}\",", code, names[0]).unwrap();
    }
    writeln!(f, "        _ => \"UNKNOWN\",\n    }}\n}}\n").unwrap();

    writeln!(f, "/// Every accepted key name paired with its code").unwrap();
    writeln!(f, "const KEY_NAMES: &[(&str, u16)] = &[").unwrap();
    for (_, code, names) in KEYS {
        for name in names.iter() {
            writeln!(f, "    (\"{}\", 0x{:02X}),", name, code).unwrap();
        }
    }
    writeln!(f, "];").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
