// Doxmap Custom Action Dispatcher
// Turns custom keycodes and legacy macro ids into host operations

use crate::action::{CustomKeycode, MacroId};
use crate::combo::Combo;
use crate::modifier::Modifier;
use crate::output::{HostOp, OutputBatch};
use crate::record::KeyEvent;
use crate::settings::Settings;
use crate::Key;

/// Whether the host should continue with its default handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// The dispatcher handled the event; skip default processing
    Consumed,
    /// Not a keycode this keymap defines
    PassThrough,
}

/// The result of dispatching one key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub handling: Handling,
    pub ops: OutputBatch,
}

impl Outcome {
    pub fn consumed(ops: OutputBatch) -> Self {
        Self {
            handling: Handling::Consumed,
            ops,
        }
    }

    /// Handled, nothing to emit
    pub fn swallowed() -> Self {
        Self::consumed(OutputBatch::new())
    }

    pub fn pass_through() -> Self {
        Self {
            handling: Handling::PassThrough,
            ops: OutputBatch::new(),
        }
    }

    /// The value the host's `process_record_user` hook returns is the
    /// negation of this: true means stop default processing.
    pub fn suppress_default(&self) -> bool {
        self.handling == Handling::Consumed
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Dispatches keymap-defined keycodes.
///
/// Every action fires on press. Releases of known keycodes are swallowed so
/// nothing is emitted twice.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    identification: String,
    rgb_solid_mode: Option<u8>,
}

impl Dispatcher {
    pub fn new(settings: &Settings) -> Self {
        let rgb_solid_mode = settings
            .rgblight_enabled()
            .then(|| settings.solid_mode());
        Self {
            identification: settings.identification(),
            rgb_solid_mode,
        }
    }

    /// The text VRSN and `M(0)` type
    pub fn identification(&self) -> &str {
        &self.identification
    }

    /// Entry point for a raw keycode, as the host hands it over
    pub fn process_record(&self, keycode: u16, event: KeyEvent) -> Outcome {
        match CustomKeycode::from_code(keycode) {
            Some(custom) => self.process_custom(custom, event),
            None => Outcome::pass_through(),
        }
    }

    pub fn process_custom(&self, keycode: CustomKeycode, event: KeyEvent) -> Outcome {
        if event.is_released() {
            return Outcome::swallowed();
        }
        log::debug!("dispatch {} on {}", keycode, event);

        let mut ops = OutputBatch::new();
        match keycode {
            CustomKeycode::Eprm => ops.push(HostOp::ResetEeprom),
            CustomKeycode::Version => ops.push(HostOp::SendString(self.identification.clone())),
            CustomKeycode::RgbSolid => match self.rgb_solid_mode {
                Some(mode) => ops.push(HostOp::RgbMode(mode)),
                None => log::debug!("underglow disabled, {} ignored", keycode),
            },
            CustomKeycode::AltScreen => ops.extend(HostOp::tap(Key::PSCR)),
            CustomKeycode::MacScreenshot => ops.extend(
                Combo::new([Modifier::LGui, Modifier::LShift], Key::N4).tap_ops(),
            ),
            CustomKeycode::MacHome => {
                ops.extend(Combo::from_single(Modifier::LGui, Key::LEFT).tap_ops())
            }
            CustomKeycode::MacEnd => {
                ops.extend(Combo::from_single(Modifier::LGui, Key::RIGHT).tap_ops())
            }
        }
        Outcome::consumed(ops)
    }

    /// Entry point for the legacy macro hook, `M(id)`
    pub fn process_macro_id(&self, id: u8, event: KeyEvent) -> Outcome {
        match MacroId::from_id(id) {
            Some(macro_id) => self.process_macro(macro_id, event),
            None => {
                log::debug!("unknown macro id {}", id);
                Outcome::pass_through()
            }
        }
    }

    pub fn process_macro(&self, id: MacroId, event: KeyEvent) -> Outcome {
        if event.is_released() {
            return Outcome::swallowed();
        }
        log::debug!("macro {} on {}", id, event);

        let ops = match id {
            MacroId::Version => {
                let mut ops = OutputBatch::new();
                ops.push(HostOp::SendString(self.identification.clone()));
                ops
            }
            MacroId::Eprm => {
                let mut ops = OutputBatch::new();
                ops.push(HostOp::ResetEeprom);
                ops
            }
            // The host types Dvorak, so the chords name QWERTY positions.
            MacroId::CmdC => Combo::from_single(Modifier::LGui, Key::I).tap_ops(),
            MacroId::CmdV => Combo::from_single(Modifier::LGui, Key::DOT).tap_ops(),
            MacroId::CmdLeft => Combo::from_single(Modifier::LGui, Key::LEFT).tap_ops(),
            MacroId::CmdRight => Combo::from_single(Modifier::LGui, Key::RIGHT).tap_ops(),
        };
        Outcome::consumed(ops)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
