// Doxmap Layout Table
// The five layers of the anydoby ErgoDox EZ keymap and lookups over them

use crate::action::{CustomKeycode, KeyAction, MacroId, RgbCommand};
use crate::layer::{KeyPos, Layer, LayerState, COLS, NUM_LAYERS, ROWS};
use crate::modifier::Mods;
use crate::Key;

/// Grid cells with no switch on the ErgoDox EZ.
pub const ABSENT: [KeyPos; 8] = [
    KeyPos::new(2, 6),
    KeyPos::new(2, 7),
    KeyPos::new(4, 5),
    KeyPos::new(4, 6),
    KeyPos::new(4, 7),
    KeyPos::new(4, 8),
    KeyPos::new(5, 0),
    KeyPos::new(5, 13),
];

/// Number of keys on the board.
pub const KEY_COUNT: usize = ROWS * COLS - ABSENT.len();

/// Place 76 actions, given in the physical listing order, into the 6x14
/// grid. The order is: left hand rows, left thumb cluster (top pair, the
/// single key, bottom row right to left), right hand rows, right thumb
/// cluster. Absent cells become `KeyAction::No`.
#[macro_export]
macro_rules! layout_ergodox {
    (
        $k00:expr, $k01:expr, $k02:expr, $k03:expr, $k04:expr, $k05:expr, $k06:expr,
        $k10:expr, $k11:expr, $k12:expr, $k13:expr, $k14:expr, $k15:expr, $k16:expr,
        $k20:expr, $k21:expr, $k22:expr, $k23:expr, $k24:expr, $k25:expr,
        $k30:expr, $k31:expr, $k32:expr, $k33:expr, $k34:expr, $k35:expr, $k36:expr,
        $k40:expr, $k41:expr, $k42:expr, $k43:expr, $k44:expr,
        $k55:expr, $k56:expr,
        $k54:expr,
        $k53:expr, $k52:expr, $k51:expr,

        $k07:expr, $k08:expr, $k09:expr, $k0A:expr, $k0B:expr, $k0C:expr, $k0D:expr,
        $k17:expr, $k18:expr, $k19:expr, $k1A:expr, $k1B:expr, $k1C:expr, $k1D:expr,
        $k28:expr, $k29:expr, $k2A:expr, $k2B:expr, $k2C:expr, $k2D:expr,
        $k37:expr, $k38:expr, $k39:expr, $k3A:expr, $k3B:expr, $k3C:expr, $k3D:expr,
        $k49:expr, $k4A:expr, $k4B:expr, $k4C:expr, $k4D:expr,
        $k57:expr, $k58:expr,
        $k59:expr,
        $k5C:expr, $k5B:expr, $k5A:expr $(,)?
    ) => {{
        const NO: $crate::action::KeyAction = $crate::action::KeyAction::No;
        [
            [$k00, $k01, $k02, $k03, $k04, $k05, $k06, $k07, $k08, $k09, $k0A, $k0B, $k0C, $k0D],
            [$k10, $k11, $k12, $k13, $k14, $k15, $k16, $k17, $k18, $k19, $k1A, $k1B, $k1C, $k1D],
            [$k20, $k21, $k22, $k23, $k24, $k25, NO, NO, $k28, $k29, $k2A, $k2B, $k2C, $k2D],
            [$k30, $k31, $k32, $k33, $k34, $k35, $k36, $k37, $k38, $k39, $k3A, $k3B, $k3C, $k3D],
            [$k40, $k41, $k42, $k43, $k44, NO, NO, NO, NO, $k49, $k4A, $k4B, $k4C, $k4D],
            [NO, $k51, $k52, $k53, $k54, $k55, $k56, $k57, $k58, $k59, $k5A, $k5B, $k5C, NO],
        ]
    }};
}

/// One layer's worth of actions, indexed `[row][col]`.
pub type LayerGrid = [[KeyAction; COLS]; ROWS];

const TRNS: KeyAction = KeyAction::Transparent;

const fn kc(key: Key) -> KeyAction {
    KeyAction::Key(key)
}

const fn mo(layer: Layer) -> KeyAction {
    KeyAction::Momentary(layer)
}

const fn lt(layer: Layer, key: Key) -> KeyAction {
    KeyAction::LayerTap(layer, key)
}

const fn lsft(key: Key) -> KeyAction {
    KeyAction::Modded(Mods::LSHIFT, key)
}

const fn lctl(key: Key) -> KeyAction {
    KeyAction::Modded(Mods::LCTRL, key)
}

const fn lalt(key: Key) -> KeyAction {
    KeyAction::Modded(Mods::LALT, key)
}

const fn alt_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::LALT, key)
}

const fn ctl_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::LCTRL, key)
}

const fn sft_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::LSHIFT, key)
}

const fn gui_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::LGUI, key)
}

const fn meh_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::MEH, key)
}

const fn all_t(key: Key) -> KeyAction {
    KeyAction::ModTap(Mods::HYPR, key)
}

const fn m(id: MacroId) -> KeyAction {
    KeyAction::Macro(id)
}

const fn rgb(command: RgbCommand) -> KeyAction {
    KeyAction::Rgb(command)
}

const VRSN: KeyAction = KeyAction::Custom(CustomKeycode::Version);
const RGB_SLD: KeyAction = KeyAction::Custom(CustomKeycode::RgbSolid);
const ALT_SCRN: KeyAction = KeyAction::Custom(CustomKeycode::AltScreen);
const MAC_SCREENSHOT: KeyAction = KeyAction::Custom(CustomKeycode::MacScreenshot);
const MAC_HOME: KeyAction = KeyAction::Custom(CustomKeycode::MacHome);
const MAC_END: KeyAction = KeyAction::Custom(CustomKeycode::MacEnd);

const EXLM: KeyAction = lsft(Key::N1);
const AT: KeyAction = lsft(Key::N2);
const HASH: KeyAction = lsft(Key::N3);
const DLR: KeyAction = lsft(Key::N4);
const PERC: KeyAction = lsft(Key::N5);
const CIRC: KeyAction = lsft(Key::N6);
const AMPR: KeyAction = lsft(Key::N7);
const ASTR: KeyAction = lsft(Key::N8);
const LPRN: KeyAction = lsft(Key::N9);
const RPRN: KeyAction = lsft(Key::N0);
const UNDS: KeyAction = lsft(Key::MINUS);
const PLUS: KeyAction = lsft(Key::EQUAL);
const PIPE: KeyAction = lsft(Key::BSLS);
const TILD: KeyAction = lsft(Key::GRAVE);

use Layer::{Media as MDIA, Navigation as NAVI, Symbols as SYMB};

/// Dvorak is done by the host, so the base layer is QWERTY-labelled.
#[rustfmt::skip]
const BASE_LAYER: LayerGrid = layout_ergodox!(
    // left hand
    kc(Key::ESC),   kc(Key::F2),     kc(Key::F3),     kc(Key::F4),     kc(Key::F5),     kc(Key::F6),     kc(Key::F8),
    kc(Key::TAB),   kc(Key::Q),      kc(Key::W),      kc(Key::E),      kc(Key::R),      kc(Key::T),      ALT_SCRN,
    kc(Key::DELETE), alt_t(Key::A),  ctl_t(Key::S),   sft_t(Key::D),   gui_t(Key::F),   kc(Key::G),
    kc(Key::LSFT),  ctl_t(Key::Z),   kc(Key::X),      kc(Key::C),      kc(Key::V),      gui_t(Key::B),   MAC_SCREENSHOT,
    mo(SYMB),       kc(Key::PGDN),   kc(Key::PGUP),   kc(Key::LEFT),   kc(Key::RIGHT),
                                                      alt_t(Key::APP), kc(Key::LGUI),
                                                                       kc(Key::HOME),
                                     kc(Key::SPACE),  kc(Key::BSPC),   kc(Key::END),
    // right hand
    kc(Key::N1),    kc(Key::F7),     kc(Key::F8),     kc(Key::F9),     kc(Key::F10),    kc(Key::F11),    kc(Key::F12),
    kc(Key::PSCR),  kc(Key::Y),      kc(Key::U),      kc(Key::I),      kc(Key::O),      kc(Key::P),      kc(Key::BSLS),
                    kc(Key::H),      kc(Key::J),      lt(NAVI, Key::K), lt(MDIA, Key::L), kc(Key::SCLN), gui_t(Key::QUOT),
    TILD,           alt_t(Key::N),   gui_t(Key::M),   kc(Key::COMMA),  kc(Key::DOT),    ctl_t(Key::SLASH), kc(Key::RSFT),
                                     kc(Key::UP),     kc(Key::DOWN),   kc(Key::LBRC),   kc(Key::RBRC),   mo(SYMB),
    kc(Key::LALT),  ctl_t(Key::ESC),
    kc(Key::PGUP),
    kc(Key::PGDN),  kc(Key::TAB),    kc(Key::ENTER),
);

/// Symbols on the left, numpad on the right, underglow on the thumbs.
#[rustfmt::skip]
const SYMB_LAYER: LayerGrid = layout_ergodox!(
    // left hand
    VRSN,           kc(Key::N1),     kc(Key::N2),     kc(Key::N3),     kc(Key::N4),     kc(Key::N5),     TRNS,
    TRNS,           EXLM,            AT,              UNDS,            PLUS,            PIPE,            TRNS,
    TRNS,           HASH,            DLR,             LPRN,            RPRN,            kc(Key::GRAVE),
    TRNS,           PERC,            CIRC,            kc(Key::MINUS),  kc(Key::EQUAL),  TILD,            TRNS,
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,
                                                      rgb(RgbCommand::ModeForward), TRNS,
                                                                       TRNS,
                                     rgb(RgbCommand::ValDown), kc(Key::BSPC), TRNS,
    // right hand
    TRNS,           kc(Key::N6),     kc(Key::N7),     kc(Key::N8),     kc(Key::N9),     kc(Key::N0),     kc(Key::F11),
    TRNS,           kc(Key::UP),     kc(Key::N7),     kc(Key::N8),     kc(Key::N9),     ASTR,            kc(Key::F12),
                    kc(Key::DOWN),   kc(Key::N4),     kc(Key::N5),     kc(Key::N6),     PLUS,            TRNS,
    TRNS,           AMPR,            kc(Key::N1),     kc(Key::N2),     kc(Key::N3),     kc(Key::BSLS),   TRNS,
                                     kc(Key::E),      kc(Key::DOT),    kc(Key::N0),     kc(Key::EQUAL),  TRNS,
    rgb(RgbCommand::Toggle), RGB_SLD,
    TRNS,
    TRNS,           rgb(RgbCommand::HueDown), rgb(RgbCommand::HueUp),
);

/// Mouse on the left, media on the right.
#[rustfmt::skip]
const MDIA_LAYER: LayerGrid = layout_ergodox!(
    // left hand
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
    TRNS,           TRNS,            kc(Key::WH_L),   kc(Key::MS_U),   kc(Key::WH_R),   TRNS,            TRNS,
    TRNS,           TRNS,            kc(Key::MS_L),   kc(Key::MS_D),   kc(Key::MS_R),   TRNS,
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            kc(Key::BTN1),   TRNS,
    TRNS,           TRNS,            TRNS,            kc(Key::BTN2),   kc(Key::BTN1),
                                                      TRNS,            TRNS,
                                                                       TRNS,
                                     TRNS,            TRNS,            TRNS,
    // right hand
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
    TRNS,           TRNS,            TRNS,            kc(Key::WH_U),   kc(Key::WH_U),   TRNS,            TRNS,
                    TRNS,            kc(Key::ACL2),   kc(Key::ACL1),   TRNS,            TRNS,            kc(Key::MPLY),
    TRNS,           TRNS,            TRNS,            kc(Key::MPRV),   kc(Key::MNXT),   kc(Key::WH_D),   TRNS,
                                     kc(Key::VOLU),   kc(Key::VOLD),   kc(Key::MUTE),   TRNS,            TRNS,
    TRNS,           TRNS,
    TRNS,
    TRNS,           TRNS,            kc(Key::WBAK),
);

/// Cursor movement and copy/paste.
#[rustfmt::skip]
const NAVI_LAYER: LayerGrid = layout_ergodox!(
    // left hand
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
    TRNS,           TRNS,            kc(Key::HOME),   kc(Key::UP),     kc(Key::END),    TRNS,            TRNS,
    TRNS,           kc(Key::PGUP),   kc(Key::LEFT),   kc(Key::DOWN),   kc(Key::RIGHT),  TRNS,
    TRNS,           kc(Key::PGDN),   MAC_HOME,        TRNS,            MAC_END,         lctl(Key::INSERT), TRNS,
    TRNS,           TRNS,            TRNS,            TRNS,            lsft(Key::DELETE),
                                                      TRNS,            TRNS,
                                                                       TRNS,
                                     lsft(Key::INSERT), kc(Key::BSPC), TRNS,
    // right hand
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
    TRNS,           TRNS,            TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
                    TRNS,            kc(Key::RCTL),   TRNS,            kc(Key::RSFT),   TRNS,            TRNS,
    TRNS,           m(MacroId::CmdC), m(MacroId::CmdV), TRNS,          TRNS,            TRNS,            TRNS,
                                     TRNS,            TRNS,            TRNS,            TRNS,            TRNS,
    TRNS,           TRNS,
    TRNS,
    TRNS,           kc(Key::TAB),    kc(Key::ENTER),
);

/// Plain QWERTY for Cyrillic input on the host.
#[rustfmt::skip]
const QWERTY_LAYER: LayerGrid = layout_ergodox!(
    // left hand
    kc(Key::RBRC),  kc(Key::N1),     kc(Key::N2),     kc(Key::N3),     kc(Key::N4),     kc(Key::N5),     kc(Key::LEFT),
    kc(Key::DELETE), kc(Key::Q),     kc(Key::W),      kc(Key::E),      kc(Key::R),      kc(Key::T),      TRNS,
    kc(Key::BSPC),  alt_t(Key::A),   kc(Key::S),      kc(Key::D),      kc(Key::F),      kc(Key::G),
    kc(Key::LSFT),  ctl_t(Key::Z),   kc(Key::X),      kc(Key::C),      kc(Key::V),      kc(Key::B),      all_t(Key::NO),
    mo(SYMB),       kc(Key::QUOT),   lalt(Key::LSFT), kc(Key::LEFT),   kc(Key::RIGHT),
                                                      alt_t(Key::APP), kc(Key::LGUI),
                                                                       kc(Key::HOME),
                                     kc(Key::SPACE),  kc(Key::BSPC),   kc(Key::END),
    // right hand
    kc(Key::RIGHT), kc(Key::N6),     kc(Key::N7),     kc(Key::N8),     kc(Key::N9),     kc(Key::N0),     kc(Key::MINUS),
    TRNS,           kc(Key::Y),      kc(Key::U),      kc(Key::I),      kc(Key::O),      kc(Key::P),      kc(Key::LBRC),
                    kc(Key::H),      kc(Key::J),      kc(Key::K),      lt(NAVI, Key::L), lt(MDIA, Key::SCLN), gui_t(Key::QUOT),
    meh_t(Key::NO), kc(Key::N),      kc(Key::M),      kc(Key::COMMA),  kc(Key::DOT),    ctl_t(Key::SLASH), kc(Key::RSFT),
                                     kc(Key::UP),     kc(Key::DOWN),   kc(Key::LBRC),   kc(Key::RBRC),   mo(SYMB),
    kc(Key::LALT),  ctl_t(Key::ESC),
    kc(Key::PGUP),
    kc(Key::PGDN),  kc(Key::TAB),    kc(Key::ENTER),
);

/// The keyboard's layout.
pub static KEYMAP: Keymap = Keymap::new([
    BASE_LAYER,
    SYMB_LAYER,
    MDIA_LAYER,
    NAVI_LAYER,
    QWERTY_LAYER,
]);

/// Problems `Keymap::validate` looks for
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapIssue {
    #[error("{0} on the base layer is KC_NO")]
    UnboundOnBase(KeyPos),

    #[error("{0} on the base layer is transparent, with nothing below")]
    TransparentOnBase(KeyPos),

    #[error("{layer} binds absent position {pos} to {action}")]
    AbsentCellBound {
        layer: Layer,
        pos: KeyPos,
        action: KeyAction,
    },

    #[error("{layer} {pos} holds the base layer, which is always active")]
    HoldsBase { layer: Layer, pos: KeyPos },
}

/// A complete multi-layer layout table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    layers: [LayerGrid; NUM_LAYERS],
}

impl Keymap {
    pub const fn new(layers: [LayerGrid; NUM_LAYERS]) -> Self {
        Self { layers }
    }

    /// Whether a switch exists at `pos`
    pub fn is_populated(pos: KeyPos) -> bool {
        usize::from(pos.row) < ROWS && usize::from(pos.col) < COLS && !ABSENT.contains(&pos)
    }

    /// Every position with a switch, row-major
    pub fn positions() -> impl Iterator<Item = KeyPos> {
        KeyPos::all().filter(|pos| Self::is_populated(*pos))
    }

    pub fn layer(&self, layer: Layer) -> &LayerGrid {
        &self.layers[layer.index()]
    }

    /// The action bound at `pos` on `layer`. Positions off the grid read as `No`.
    pub fn action(&self, layer: Layer, pos: KeyPos) -> KeyAction {
        self.layers[layer.index()]
            .get(usize::from(pos.row))
            .and_then(|row| row.get(usize::from(pos.col)))
            .copied()
            .unwrap_or(KeyAction::No)
    }

    /// The first non-transparent action at `pos`, searching active layers
    /// from the highest down, together with the layer it came from.
    pub fn resolve_with_layer(&self, state: &LayerState, pos: KeyPos) -> Option<(Layer, KeyAction)> {
        state
            .iter_active_desc()
            .map(|layer| (layer, self.action(layer, pos)))
            .find(|(_, action)| !action.is_transparent())
    }

    /// What pressing `pos` does under `state`. Falls back to `No` when every
    /// active layer is transparent there.
    pub fn resolve(&self, state: &LayerState, pos: KeyPos) -> KeyAction {
        self.resolve_with_layer(state, pos)
            .map(|(_, action)| action)
            .unwrap_or(KeyAction::No)
    }

    /// Every (layer, position, action) triple over populated positions
    pub fn iter(&self) -> impl Iterator<Item = (Layer, KeyPos, KeyAction)> + '_ {
        Layer::ALL
            .into_iter()
            .flat_map(move |layer| Self::positions().map(move |pos| (layer, pos, self.action(layer, pos))))
    }

    /// Where `action` is bound
    pub fn find(&self, action: KeyAction) -> Vec<(Layer, KeyPos)> {
        self.iter()
            .filter(|(_, _, a)| *a == action)
            .map(|(layer, pos, _)| (layer, pos))
            .collect()
    }

    /// Structural checks over the whole table. An empty result means the
    /// table is sound.
    pub fn validate(&self) -> Vec<KeymapIssue> {
        let mut issues = Vec::new();

        for pos in Self::positions() {
            match self.action(Layer::Base, pos) {
                KeyAction::No => issues.push(KeymapIssue::UnboundOnBase(pos)),
                KeyAction::Transparent => issues.push(KeymapIssue::TransparentOnBase(pos)),
                _ => {}
            }
        }

        for layer in Layer::ALL {
            for pos in ABSENT {
                let action = self.action(layer, pos);
                if action != KeyAction::No {
                    issues.push(KeymapIssue::AbsentCellBound { layer, pos, action });
                }
            }
            for pos in Self::positions() {
                if self.action(layer, pos).target_layer() == Some(Layer::Base) {
                    issues.push(KeymapIssue::HoldsBase { layer, pos });
                }
            }
        }

        for issue in &issues {
            log::debug!("keymap issue: {}", issue);
        }
        issues
    }
}
