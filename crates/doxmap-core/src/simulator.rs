// Doxmap Simulator
// Drives the layout table, dispatcher and indicators the way the firmware would

use std::collections::HashMap;

use crate::action::KeyAction;
use crate::indicator::{Indicators, LayerObserver};
use crate::keymap::{Keymap, KEYMAP};
use crate::layer::{KeyPos, Layer, LayerState};
use crate::modifier::Mods;
use crate::output::{apply_ops, HostError, HostOp, HostRuntime, OutputBatch, RecordingHost};
use crate::process::{Dispatcher, Outcome};
use crate::record::{KeyEvent, KeyRecord};
use crate::settings::Settings;
use crate::Key;

/// What one press or release caused
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// The action the position resolved to, if anything was pressed
    pub action: Option<KeyAction>,
    /// Operations performed on the host, in order
    pub ops: Vec<HostOp>,
    /// New LED set, when the displayed layer changed
    pub indicators: Option<Indicators>,
}

impl Step {
    fn merge(&mut self, other: Step) {
        self.ops.extend(other.ops);
        if other.indicators.is_some() {
            self.indicators = other.indicators;
        }
    }
}

/// Dual-role keys start out undecided and become holds when another key
/// goes down before they are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Pending,
    Hold,
    Plain,
}

#[derive(Debug, Clone, Copy)]
struct Held {
    action: KeyAction,
    role: Role,
}

/// A model of the firmware running this keymap against a host.
///
/// Each held position remembers the action it resolved to when pressed, so
/// a release always undoes what the press did even if the layers changed in
/// between.
pub struct Simulator<H: HostRuntime = RecordingHost> {
    keymap: Keymap,
    layers: LayerState,
    dispatcher: Dispatcher,
    observer: LayerObserver,
    indicators: Indicators,
    held: HashMap<KeyPos, Held>,
    order: Vec<KeyPos>,
    host: H,
}

impl Simulator<RecordingHost> {
    /// The stock keymap with a recording host
    pub fn new(settings: &Settings) -> Self {
        Self::with_host(KEYMAP.clone(), settings, RecordingHost::new())
    }
}

impl Default for Simulator<RecordingHost> {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl<H: HostRuntime> Simulator<H> {
    pub fn with_host(keymap: Keymap, settings: &Settings, host: H) -> Self {
        let mut observer = LayerObserver::new();
        let layers = LayerState::new();
        let indicators = observer.force(layers.bits());
        Self {
            keymap,
            layers,
            dispatcher: Dispatcher::new(settings),
            observer,
            indicators,
            held: HashMap::new(),
            order: Vec::new(),
            host,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn layer_state(&self) -> LayerState {
        self.layers
    }

    /// The layer the LEDs currently show
    pub fn active_layer(&self) -> Layer {
        self.layers.highest()
    }

    pub fn indicators(&self) -> Indicators {
        self.indicators
    }

    /// Positions held down, in press order
    pub fn held_positions(&self) -> &[KeyPos] {
        &self.order
    }

    pub fn is_held(&self, pos: KeyPos) -> bool {
        self.held.contains_key(&pos)
    }

    /// What pressing `pos` right now would do
    pub fn peek(&self, pos: KeyPos) -> KeyAction {
        self.keymap.resolve(&self.layers, pos)
    }

    /// Toggle a layer from outside the table, as a host-side switch would.
    pub fn toggle_layer(&mut self, layer: Layer) -> Option<Indicators> {
        self.layers.toggle(layer);
        self.observe()
    }

    /// Replace the whole layer state
    pub fn set_layer_state(&mut self, bits: u32) -> Option<Indicators> {
        self.layers = LayerState::from_bits(bits);
        self.observe()
    }

    /// Feed a host key record
    pub fn process(&mut self, record: KeyRecord) -> Result<Step, HostError> {
        match record.event {
            KeyEvent::Press => self.press(record.pos),
            KeyEvent::Release => self.release(record.pos),
        }
    }

    pub fn press(&mut self, pos: KeyPos) -> Result<Step, HostError> {
        if self.held.contains_key(&pos) {
            log::debug!("{} pressed while already held", pos);
            return Ok(Step::default());
        }

        let mut step = self.settle_pending()?;
        let action = self.keymap.resolve(&self.layers, pos);
        log::debug!("press {} -> {}", pos, action);

        let mut ops = OutputBatch::new();
        let role = match action {
            KeyAction::No | KeyAction::Transparent | KeyAction::Rgb(_) => Role::Plain,
            KeyAction::Key(key) => {
                ops.push(HostOp::KeyDown(key));
                Role::Plain
            }
            KeyAction::Modded(mods, key) => {
                ops.extend(mods.keys().map(HostOp::KeyDown));
                ops.push(HostOp::KeyDown(key));
                Role::Plain
            }
            KeyAction::Momentary(layer) => {
                self.layers.activate(layer);
                Role::Plain
            }
            KeyAction::ModTap(..) | KeyAction::LayerTap(..) => Role::Pending,
            KeyAction::Custom(custom) => {
                ops = self.dispatcher.process_custom(custom, KeyEvent::Press).ops;
                Role::Plain
            }
            KeyAction::Macro(id) => {
                ops = self.dispatcher.process_macro(id, KeyEvent::Press).ops;
                Role::Plain
            }
        };

        self.held.insert(pos, Held { action, role });
        self.order.push(pos);
        step.merge(self.emit(ops)?);
        step.action = Some(action);
        Ok(step)
    }

    pub fn release(&mut self, pos: KeyPos) -> Result<Step, HostError> {
        let Some(held) = self.held.remove(&pos) else {
            log::debug!("{} released while not held", pos);
            return Ok(Step::default());
        };
        self.order.retain(|p| *p != pos);
        log::debug!("release {} ({:?} {})", pos, held.role, held.action);

        let mut ops = OutputBatch::new();
        match (held.action, held.role) {
            (KeyAction::Key(key), _) => ops.push(HostOp::KeyUp(key)),
            (KeyAction::Modded(mods, key), _) => {
                ops.push(HostOp::KeyUp(key));
                ops.extend(release_mods(mods));
            }
            (KeyAction::Momentary(layer), _) | (KeyAction::LayerTap(layer, _), Role::Hold) => {
                self.layers.deactivate(layer);
            }
            (KeyAction::ModTap(mods, _), Role::Hold) => ops.extend(release_mods(mods)),
            (KeyAction::ModTap(_, key), _) | (KeyAction::LayerTap(_, key), _) => {
                if key != Key::NO {
                    ops.extend(HostOp::tap(key));
                }
            }
            (KeyAction::Custom(custom), _) => {
                ops = self.dispatcher.process_custom(custom, KeyEvent::Release).ops;
            }
            (KeyAction::Macro(id), _) => {
                ops = self.dispatcher.process_macro(id, KeyEvent::Release).ops;
            }
            (KeyAction::No | KeyAction::Transparent | KeyAction::Rgb(_), _) => {}
        }

        let mut step = self.emit(ops)?;
        step.action = Some(held.action);
        Ok(step)
    }

    /// Press and release with nothing in between
    pub fn tap(&mut self, pos: KeyPos) -> Result<Step, HostError> {
        let mut step = self.press(pos)?;
        let action = step.action;
        step.merge(self.release(pos)?);
        step.action = action;
        Ok(step)
    }

    /// Release everything still held, most recent first
    pub fn release_all(&mut self) -> Result<Step, HostError> {
        let mut step = Step::default();
        while let Some(pos) = self.order.last().copied() {
            step.merge(self.release(pos)?);
        }
        Ok(step)
    }

    /// Another key went down: every undecided dual-role key becomes a hold.
    fn settle_pending(&mut self) -> Result<Step, HostError> {
        let mut ops = OutputBatch::new();
        for pos in &self.order {
            let Some(held) = self.held.get_mut(pos) else {
                continue;
            };
            if held.role != Role::Pending {
                continue;
            }
            held.role = Role::Hold;
            match held.action {
                KeyAction::LayerTap(layer, _) => self.layers.activate(layer),
                KeyAction::ModTap(mods, _) => ops.extend(mods.keys().map(HostOp::KeyDown)),
                _ => {}
            }
        }
        self.emit(ops)
    }

    fn emit(&mut self, ops: OutputBatch) -> Result<Step, HostError> {
        apply_ops(&mut self.host, &ops)?;
        Ok(Step {
            action: None,
            ops: ops.into_vec(),
            indicators: self.observe(),
        })
    }

    fn observe(&mut self) -> Option<Indicators> {
        let changed = self.observer.on_layer_state(self.layers.bits());
        if let Some(set) = changed {
            self.indicators = set;
        }
        changed
    }

    /// Outcome of a raw keycode, bypassing the table
    pub fn dispatch_raw(&mut self, keycode: u16, event: KeyEvent) -> Result<Outcome, HostError> {
        let outcome = self.dispatcher.process_record(keycode, event);
        apply_ops(&mut self.host, &outcome.ops)?;
        Ok(outcome)
    }
}

fn release_mods(mods: Mods) -> impl Iterator<Item = HostOp> {
    let keys: Vec<Key> = mods.keys().collect();
    keys.into_iter().rev().map(HostOp::KeyUp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulator {
        Simulator::new(&Settings::new().with_identity("ergodox_ez", "anydoby", "test"))
    }

    const K: KeyPos = KeyPos::new(2, 10);
    const SYMB_LEFT: KeyPos = KeyPos::new(4, 0);

    #[test]
    fn test_plain_key() {
        let mut sim = sim();
        let step = sim.tap(KeyPos::new(0, 0)).unwrap();
        assert_eq!(step.action, Some(KeyAction::Key(Key::ESC)));
        assert_eq!(step.ops, vec![HostOp::KeyDown(Key::ESC), HostOp::KeyUp(Key::ESC)]);
        assert_eq!(step.indicators, None);
    }

    #[test]
    fn test_momentary_layer_lights_led() {
        let mut sim = sim();
        let step = sim.press(SYMB_LEFT).unwrap();
        assert_eq!(step.indicators, Some(Indicators::LED1));
        assert_eq!(sim.active_layer(), Layer::Symbols);

        let step = sim.tap(KeyPos::new(0, 0)).unwrap();
        assert_eq!(step.ops, vec![HostOp::SendString("ergodox_ez/anydoby @ test".to_string())]);

        let step = sim.release(SYMB_LEFT).unwrap();
        assert_eq!(step.indicators, Some(Indicators::empty()));
        assert_eq!(sim.active_layer(), Layer::Base);
    }

    #[test]
    fn test_layer_tap_tap_and_hold() {
        let mut sim = sim();
        let step = sim.tap(K).unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyDown(Key::K), HostOp::KeyUp(Key::K)]);

        sim.press(K).unwrap();
        let step = sim.press(KeyPos::new(3, 8)).unwrap();
        assert_eq!(step.indicators, Some(Indicators::LED3));
        assert_eq!(step.action, Some(KeyAction::Macro(crate::action::MacroId::CmdC)));
        assert_eq!(
            step.ops,
            vec![
                HostOp::KeyDown(Key::LGUI),
                HostOp::KeyDown(Key::I),
                HostOp::KeyUp(Key::I),
                HostOp::KeyUp(Key::LGUI),
            ]
        );
        assert!(sim.release(KeyPos::new(3, 8)).unwrap().ops.is_empty());
        let step = sim.release(K).unwrap();
        assert!(step.ops.is_empty());
        assert_eq!(step.indicators, Some(Indicators::empty()));
    }

    #[test]
    fn test_mod_tap_hold() {
        let mut sim = sim();
        let alt_a = KeyPos::new(2, 1);
        sim.press(alt_a).unwrap();
        let step = sim.press(KeyPos::new(1, 1)).unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyDown(Key::LALT), HostOp::KeyDown(Key::Q)]);
        sim.release(KeyPos::new(1, 1)).unwrap();
        let step = sim.release(alt_a).unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyUp(Key::LALT)]);
        assert!(sim.host().pressed().is_empty());
    }

    #[test]
    fn test_mod_tap_tap_sends_key_only() {
        let mut sim = sim();
        let step = sim.tap(KeyPos::new(2, 1)).unwrap();
        assert_eq!(step.action, Some(KeyAction::ModTap(Mods::LALT, Key::A)));
        assert_eq!(step.ops, vec![HostOp::KeyDown(Key::A), HostOp::KeyUp(Key::A)]);
        assert!(!sim.host().ops().contains(&HostOp::KeyDown(Key::LALT)));

        // Released while still undecided, even after a pause
        sim.press(KeyPos::new(2, 2)).unwrap();
        let step = sim.release(KeyPos::new(2, 2)).unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyDown(Key::S), HostOp::KeyUp(Key::S)]);
        assert!(sim.host().pressed().is_empty());
    }

    #[test]
    fn test_release_uses_action_from_press() {
        let mut sim = sim();
        sim.press(SYMB_LEFT).unwrap();
        let one = KeyPos::new(0, 1);
        sim.press(one).unwrap();
        sim.release(SYMB_LEFT).unwrap();
        let step = sim.release(one).unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyUp(Key::N1)]);
    }

    #[test]
    fn test_modded_key_and_shifted_alias() {
        let mut sim = sim();
        let step = sim.tap(KeyPos::new(3, 7)).unwrap();
        assert_eq!(
            step.ops,
            vec![
                HostOp::KeyDown(Key::LSFT),
                HostOp::KeyDown(Key::GRAVE),
                HostOp::KeyUp(Key::GRAVE),
                HostOp::KeyUp(Key::LSFT),
            ]
        );
    }

    #[test]
    fn test_toggle_and_release_all() {
        let mut sim = sim();
        assert_eq!(sim.toggle_layer(Layer::Qwerty), Some(Indicators::LED1 | Indicators::LED3));
        assert_eq!(sim.peek(KeyPos::new(0, 0)), KeyAction::Key(Key::RBRC));
        sim.press(KeyPos::new(0, 1)).unwrap();
        sim.press(KeyPos::new(0, 2)).unwrap();
        assert_eq!(sim.held_positions(), &[KeyPos::new(0, 1), KeyPos::new(0, 2)]);
        let step = sim.release_all().unwrap();
        assert_eq!(step.ops, vec![HostOp::KeyUp(Key::N2), HostOp::KeyUp(Key::N1)]);
        assert!(sim.held_positions().is_empty());
    }

    #[test]
    fn test_repeated_press_ignored() {
        let mut sim = sim();
        sim.press(KeyPos::new(0, 0)).unwrap();
        assert_eq!(sim.press(KeyPos::new(0, 0)).unwrap(), Step::default());
        assert_eq!(sim.release(KeyPos::new(1, 0)).unwrap(), Step::default());
    }

    #[test]
    fn test_dispatch_raw_unknown() {
        let mut sim = sim();
        let outcome = sim.dispatch_raw(0x7E00, KeyEvent::Press).unwrap();
        assert!(!outcome.suppress_default());
        assert!(sim.host().ops().is_empty());
    }
}
