// Doxmap Recording Host
// In-memory host runtime used by the simulator, the tools and the tests

use super::state::PressedKeyState;
use super::{HostError, HostOp, HostRuntime};
use crate::Key;

/// A host that performs nothing and remembers everything.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    ops: Vec<HostOp>,
    pressed: PressedKeyState,
    typed: String,
    eeprom_resets: usize,
    rgb_mode: Option<u8>,
    strict: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that refuses to unregister keys it never registered
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Every operation performed so far, in order
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Drain the recorded operations, keeping the rest of the host state
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn pressed(&self) -> &PressedKeyState {
        &self.pressed
    }

    /// Text handed to `send_string`, concatenated
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Drain the typed text
    pub fn take_typed(&mut self) -> String {
        std::mem::take(&mut self.typed)
    }

    pub fn eeprom_resets(&self) -> usize {
        self.eeprom_resets
    }

    pub fn rgb_mode(&self) -> Option<u8> {
        self.rgb_mode
    }

    pub fn clear(&mut self) {
        let strict = self.strict;
        *self = Self {
            strict,
            ..Self::default()
        };
    }
}

impl HostRuntime for RecordingHost {
    fn register_code(&mut self, key: Key) -> Result<(), HostError> {
        if !self.pressed.add(key) {
            log::debug!("{} registered while already held", key);
        }
        self.ops.push(HostOp::KeyDown(key));
        Ok(())
    }

    fn unregister_code(&mut self, key: Key) -> Result<(), HostError> {
        if !self.pressed.remove(key) {
            if self.strict {
                return Err(HostError::NotRegistered(key));
            }
            log::debug!("{} unregistered while not held", key);
        }
        self.ops.push(HostOp::KeyUp(key));
        Ok(())
    }

    fn send_string(&mut self, text: &str) -> Result<(), HostError> {
        self.typed.push_str(text);
        self.ops.push(HostOp::SendString(text.to_string()));
        Ok(())
    }

    fn eeconfig_init(&mut self) -> Result<(), HostError> {
        self.eeprom_resets += 1;
        self.ops.push(HostOp::ResetEeprom);
        Ok(())
    }

    fn rgblight_mode(&mut self, mode: u8) -> Result<(), HostError> {
        self.rgb_mode = Some(mode);
        self.ops.push(HostOp::RgbMode(mode));
        Ok(())
    }
}
