// Doxmap Core Library
// Layout table, custom keycode dispatcher and layer indicators for the anydoby ErgoDox EZ keymap

pub mod action;
pub mod combo;
pub mod indicator;
pub mod key;
pub mod keymap;
pub mod layer;
pub mod modifier;
pub mod output;
pub mod process;
pub mod record;
pub mod settings;
pub mod simulator;

pub use action::{ActionParseError, CustomKeycode, KeyAction, MacroId, RgbCommand, SAFE_RANGE};
pub use combo::Combo;
pub use indicator::{apply_indicators, indicators_for, IndicatorPanel, Indicators, LayerObserver};
pub use key::{ascii_to_key, key_from_name, Key};
pub use keymap::{Keymap, KeymapIssue, LayerGrid, KEYMAP, KEY_COUNT};
pub use layer::{KeyPos, Layer, LayerState, PositionError, COLS, NUM_LAYERS, ROWS};
pub use modifier::{Modifier, Mods};
pub use output::{
    apply_ops, expand_ops, string_ops, HostError, HostOp, HostRuntime, OutputBatch, RecordingHost,
};
pub use process::{Dispatcher, Handling, Outcome};
pub use record::{KeyEvent, KeyRecord};
pub use settings::{Settings, SettingsError};
pub use simulator::{Simulator, Step};
