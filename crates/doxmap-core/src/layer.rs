// Doxmap Layers and Key Positions

use std::fmt;

use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString, IntoStaticStr};

/// Number of spatial rows on the ErgoDox grid.
pub const ROWS: usize = 6;
/// Number of spatial columns on the ErgoDox grid, both halves.
pub const COLS: usize = 14;
/// Number of layers in the keymap.
pub const NUM_LAYERS: usize = Layer::COUNT;

/// One of the mutually exclusive key-mapping tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumIter,
    EnumString,
    EnumCountMacro,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Layer {
    /// Dvorak-on-host base layer
    #[default]
    #[strum(to_string = "BASE")]
    Base = 0,
    /// Symbols and numpad
    #[strum(to_string = "SYMB")]
    Symbols = 1,
    /// Media and mouse keys
    #[strum(to_string = "MDIA")]
    Media = 2,
    /// Cursor navigation and copy/paste
    #[strum(to_string = "NAVI")]
    Navigation = 3,
    /// Plain QWERTY for Cyrillic input
    #[strum(to_string = "QWERTY")]
    Qwerty = 4,
}

impl Layer {
    /// Every layer, lowest first
    pub const ALL: [Layer; NUM_LAYERS] = [
        Layer::Base,
        Layer::Symbols,
        Layer::Media,
        Layer::Navigation,
        Layer::Qwerty,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Layer> {
        Layer::ALL.get(index).copied()
    }

    /// Resolve the layer that drives the indicators from a layer-state mask:
    /// the highest set bit. Empty masks and bits past the known layers fall
    /// back to the base layer.
    pub fn from_state(state: u32) -> Layer {
        if state == 0 {
            return Layer::Base;
        }
        let top = 31 - state.leading_zeros() as usize;
        Layer::from_index(top).unwrap_or(Layer::Base)
    }

    /// The single-bit layer-state mask for this layer
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

/// Errors for positions outside the grid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("row {0} out of range (0..6)")]
    Row(usize),

    #[error("column {0} out of range (0..14)")]
    Col(usize),
}

/// A spatial (row, column) coordinate, named `kRC` in the layout listing.
/// Columns 0-6 are the left half, 7-13 the right half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Checked constructor for positions coming from user input
    pub fn checked(row: usize, col: usize) -> Result<Self, PositionError> {
        if row >= ROWS {
            return Err(PositionError::Row(row));
        }
        if col >= COLS {
            return Err(PositionError::Col(col));
        }
        Ok(Self::new(row as u8, col as u8))
    }

    pub fn is_left(self) -> bool {
        self.col < 7
    }

    /// Iterate over every cell of the grid, row-major
    pub fn all() -> impl Iterator<Item = KeyPos> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| KeyPos::new(row as u8, col as u8)))
    }
}

impl fmt::Display for KeyPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{:X}{:X}", self.row, self.col)
    }
}

/// Reference model of the host's layer stack, used by the simulators.
///
/// The default layer is always active; other layers are bits on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerState {
    bits: u32,
}

impl Default for LayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerState {
    pub fn new() -> Self {
        Self {
            bits: Layer::Base.mask(),
        }
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits: bits | Layer::Base.mask(),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn activate(&mut self, layer: Layer) {
        self.bits |= layer.mask();
    }

    pub fn deactivate(&mut self, layer: Layer) {
        if layer != Layer::Base {
            self.bits &= !layer.mask();
        }
    }

    pub fn toggle(&mut self, layer: Layer) {
        if self.is_active(layer) {
            self.deactivate(layer);
        } else {
            self.activate(layer);
        }
    }

    pub fn is_active(&self, layer: Layer) -> bool {
        self.bits & layer.mask() != 0
    }

    /// The highest active layer
    pub fn highest(&self) -> Layer {
        Layer::from_state(self.bits)
    }

    /// Active layers, highest first
    pub fn iter_active_desc(&self) -> impl Iterator<Item = Layer> + '_ {
        Layer::ALL.into_iter().rev().filter(move |l| self.is_active(*l))
    }
}
