// Doxmap String Expansion
// Lowers SEND_STRING text into the key taps a US-layout host would see

use super::{HostOp, OutputBatch};
use crate::key::ascii_to_key;
use crate::Key;

/// Taps that type `text`. Characters with no US key are skipped.
pub fn string_ops(text: &str) -> OutputBatch {
    let mut ops = OutputBatch::new();
    for ch in text.chars() {
        match ascii_to_key(ch) {
            Some((key, true)) => {
                ops.push(HostOp::KeyDown(Key::LSFT));
                ops.extend(HostOp::tap(key));
                ops.push(HostOp::KeyUp(Key::LSFT));
            }
            Some((key, false)) => ops.extend(HostOp::tap(key)),
            None => log::warn!("no key types {:?}, skipping", ch),
        }
    }
    ops
}

/// Replace every `SendString` in `ops` with the taps it stands for.
pub fn expand_ops(ops: &[HostOp]) -> Vec<HostOp> {
    let mut out = Vec::with_capacity(ops.len());
    for op in ops {
        match op {
            HostOp::SendString(text) => out.extend(string_ops(text)),
            other => out.push(other.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_ops_plain_and_shifted() {
        let ops = string_ops("a/A");
        assert_eq!(
            ops.as_slice(),
            &[
                HostOp::KeyDown(Key::A),
                HostOp::KeyUp(Key::A),
                HostOp::KeyDown(Key::SLASH),
                HostOp::KeyUp(Key::SLASH),
                HostOp::KeyDown(Key::LSFT),
                HostOp::KeyDown(Key::A),
                HostOp::KeyUp(Key::A),
                HostOp::KeyUp(Key::LSFT),
            ]
        );
    }

    #[test]
    fn test_string_ops_skips_non_ascii() {
        assert_eq!(string_ops("Ъ").len(), 0);
        assert_eq!(string_ops("xЪ").len(), 2);
    }

    #[test]
    fn test_expand_ops_keeps_other_ops() {
        let ops = vec![
            HostOp::ResetEeprom,
            HostOp::SendString("1 ".to_string()),
            HostOp::RgbMode(1),
        ];
        assert_eq!(
            expand_ops(&ops),
            vec![
                HostOp::ResetEeprom,
                HostOp::KeyDown(Key::N1),
                HostOp::KeyUp(Key::N1),
                HostOp::KeyDown(Key::SPACE),
                HostOp::KeyUp(Key::SPACE),
                HostOp::RgbMode(1),
            ]
        );
    }
}
