// Doxmap Simulator Scenarios
//
// Typing sequences through the full table, dispatcher and indicator path.
//
// Run with: cargo test --test simulator_test

use doxmap_core::{
    HostOp, Indicators, Key, KeyAction, KeyEvent, KeyPos, KeyRecord, Layer, RecordingHost,
    Settings, Simulator,
};

// =========================================================================
// Test Helpers
// =========================================================================

const SYMB_HOLD: KeyPos = KeyPos::new(4, 0);
const NAVI_K: KeyPos = KeyPos::new(2, 10);
const MDIA_L: KeyPos = KeyPos::new(2, 11);

fn simulator() -> Simulator {
    Simulator::new(&Settings::new().with_identity("ergodox_ez", "anydoby", "dev"))
}

/// Hold `hold`, tap `key`, release `hold`; return everything the host saw.
fn hold_and_tap(sim: &mut Simulator, hold: KeyPos, key: KeyPos) -> Vec<HostOp> {
    let mut ops = sim.press(hold).unwrap().ops;
    ops.extend(sim.tap(key).unwrap().ops);
    ops.extend(sim.release(hold).unwrap().ops);
    ops
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_navigation_copy_paste() {
    let mut sim = simulator();
    let ops = hold_and_tap(&mut sim, NAVI_K, KeyPos::new(3, 9));
    assert_eq!(
        ops,
        vec![
            HostOp::KeyDown(Key::LGUI),
            HostOp::KeyDown(Key::DOT),
            HostOp::KeyUp(Key::DOT),
            HostOp::KeyUp(Key::LGUI),
        ]
    );
    assert_eq!(sim.indicators(), Indicators::empty());
}

#[test]
fn test_navigation_line_end() {
    let mut sim = simulator();
    let ops = hold_and_tap(&mut sim, NAVI_K, KeyPos::new(3, 4));
    assert_eq!(ops[1], HostOp::KeyDown(Key::RIGHT));
    assert_eq!(ops.len(), 4);
}

#[test]
fn test_media_layer_indicator() {
    let mut sim = simulator();
    sim.press(MDIA_L).unwrap();
    let step = sim.press(KeyPos::new(4, 9)).unwrap();
    assert_eq!(step.indicators, Some(Indicators::LED2));
    assert_eq!(step.action, Some(KeyAction::Key(Key::VOLU)));
    sim.release_all().unwrap();
    assert_eq!(sim.indicators(), Indicators::empty());
    assert!(sim.host().pressed().is_empty());
}

#[test]
fn test_symbols_passthrough_to_base() {
    let mut sim = simulator();
    sim.press(SYMB_HOLD).unwrap();
    // k16 is transparent on SYMB
    let step = sim.tap(KeyPos::new(1, 6)).unwrap();
    assert_eq!(step.action, Some(KeyAction::Custom(doxmap_core::CustomKeycode::AltScreen)));
    assert_eq!(step.ops, vec![HostOp::KeyDown(Key::PSCR), HostOp::KeyUp(Key::PSCR)]);
    sim.release(SYMB_HOLD).unwrap();
}

#[test]
fn test_version_and_records() {
    let mut sim = simulator();
    sim.process(KeyRecord::new(SYMB_HOLD, KeyEvent::Press)).unwrap();
    sim.process(KeyRecord::new(KeyPos::new(0, 0), KeyEvent::Press)).unwrap();
    sim.process(KeyRecord::new(KeyPos::new(0, 0), KeyEvent::Release)).unwrap();
    sim.process(KeyRecord::new(SYMB_HOLD, KeyEvent::Release)).unwrap();
    assert_eq!(sim.host().typed(), "ergodox_ez/anydoby @ dev");
}

#[test]
fn test_rgb_solid_disabled() {
    let mut sim = Simulator::new(&Settings::new().with_rgblight(false));
    let ops = hold_and_tap(&mut sim, SYMB_HOLD, KeyPos::new(5, 8));
    assert!(ops.is_empty());
    assert_eq!(sim.host().rgb_mode(), None);
}

#[test]
fn test_qwerty_toggle_lights_two_leds() {
    let mut sim = simulator();
    assert_eq!(sim.toggle_layer(Layer::Qwerty), Some(Indicators::LED1 | Indicators::LED3));
    let step = sim.tap(KeyPos::new(2, 2)).unwrap();
    assert_eq!(step.ops, vec![HostOp::KeyDown(Key::S), HostOp::KeyUp(Key::S)]);

    // SYMB sits below QWERTY, so the LEDs keep showing QWERTY
    let step = sim.press(SYMB_HOLD).unwrap();
    assert_eq!(step.indicators, None);
    assert_eq!(sim.active_layer(), Layer::Qwerty);
    sim.release(SYMB_HOLD).unwrap();
    assert_eq!(sim.toggle_layer(Layer::Qwerty), Some(Indicators::empty()));
}

#[test]
fn test_hyper_tap_sends_nothing() {
    let mut sim = simulator();
    sim.toggle_layer(Layer::Qwerty);
    let step = sim.tap(KeyPos::new(3, 6)).unwrap();
    assert!(step.ops.is_empty());
}

#[test]
fn test_strict_host_balanced() {
    let mut sim = Simulator::with_host(
        doxmap_core::KEYMAP.clone(),
        &Settings::default(),
        RecordingHost::strict(),
    );
    for pos in doxmap_core::Keymap::positions() {
        sim.tap(pos).unwrap();
    }
    assert!(sim.held_positions().is_empty());
    assert!(sim.host().pressed().is_empty());
}
