// Doxmap Output Layer
// Host operations emitted by the dispatcher and the runtime that performs them

mod recording;
mod state;
mod text;

use smallvec::SmallVec;

use crate::Key;

pub use recording::RecordingHost;
pub use state::PressedKeyState;
pub use text::{expand_ops, string_ops};

/// One effect the firmware host performs on behalf of the keymap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostOp {
    /// Register a keycode as held
    KeyDown(Key),
    /// Unregister a held keycode
    KeyUp(Key),
    /// Type an ASCII string
    SendString(String),
    /// Reset persistent configuration to defaults
    ResetEeprom,
    /// Switch the underglow to the given effect mode
    RgbMode(u8),
}

impl HostOp {
    /// Convenience: a key press immediately followed by its release
    pub fn tap(key: Key) -> [HostOp; 2] {
        [HostOp::KeyDown(key), HostOp::KeyUp(key)]
    }
}

/// Ordered operations produced by a single key event.
///
/// Every chord in this keymap fits inline, so no allocation happens on the
/// hot path.
pub type OutputBatch = SmallVec<[HostOp; 8]>;

/// Error types for host operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("key {0} is not registered")]
    NotRegistered(Key),
}

/// The firmware services the keymap relies on.
pub trait HostRuntime {
    fn register_code(&mut self, key: Key) -> Result<(), HostError>;
    fn unregister_code(&mut self, key: Key) -> Result<(), HostError>;
    fn send_string(&mut self, text: &str) -> Result<(), HostError>;
    fn eeconfig_init(&mut self) -> Result<(), HostError>;
    fn rgblight_mode(&mut self, mode: u8) -> Result<(), HostError>;
}

/// Perform `ops` against `host` in order, stopping at the first failure.
pub fn apply_ops<H: HostRuntime + ?Sized>(host: &mut H, ops: &[HostOp]) -> Result<(), HostError> {
    for op in ops {
        log::trace!("host op: {:?}", op);
        match op {
            HostOp::KeyDown(key) => host.register_code(*key)?,
            HostOp::KeyUp(key) => host.unregister_code(*key)?,
            HostOp::SendString(text) => host.send_string(text)?,
            HostOp::ResetEeprom => host.eeconfig_init()?,
            HostOp::RgbMode(mode) => host.rgblight_mode(*mode)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_ops_in_order() {
        let mut host = RecordingHost::new();
        let ops = [
            HostOp::KeyDown(Key::LGUI),
            HostOp::KeyDown(Key::LEFT),
            HostOp::KeyUp(Key::LEFT),
            HostOp::KeyUp(Key::LGUI),
            HostOp::RgbMode(1),
        ];
        apply_ops(&mut host, &ops).unwrap();
        assert_eq!(host.ops(), &ops);
        assert_eq!(host.rgb_mode(), Some(1));
        assert!(host.pressed().is_empty());
    }

    #[test]
    fn test_apply_ops_stops_on_error() {
        let mut host = RecordingHost::strict();
        let ops = [HostOp::KeyUp(Key::A), HostOp::KeyDown(Key::B)];
        assert_eq!(apply_ops(&mut host, &ops), Err(HostError::NotRegistered(Key::A)));
        assert!(host.ops().is_empty());
    }

    #[test]
    fn test_tap_helper() {
        assert_eq!(HostOp::tap(Key::PSCR), [HostOp::KeyDown(Key::PSCR), HostOp::KeyUp(Key::PSCR)]);
    }
}
