// Doxmap Layer Indicators
// Maps the active layer to the three right-hand LEDs

use bitflags::bitflags;

use crate::layer::Layer;

bitflags! {
    /// The right-hand indicator LEDs that are lit.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Indicators: u8 {
        const LED1 = 0b001;
        const LED2 = 0b010;
        const LED3 = 0b100;
    }
}

impl Indicators {
    /// Number of right-hand LEDs
    pub const COUNT: u8 = 3;

    /// Whether LED `index` (1-based, as printed on the board) is on
    pub fn is_lit(self, index: u8) -> bool {
        (1..=Self::COUNT).contains(&index) && self.bits() & (1 << (index - 1)) != 0
    }

    /// LED indices that are on, ascending
    pub fn lit(self) -> impl Iterator<Item = u8> {
        (1..=Self::COUNT).filter(move |i| self.is_lit(*i))
    }
}

/// The LEDs that identify `layer`. The base layer lights none.
pub const fn indicators_for(layer: Layer) -> Indicators {
    match layer {
        Layer::Base => Indicators::empty(),
        Layer::Symbols => Indicators::LED1,
        Layer::Media => Indicators::LED2,
        Layer::Navigation => Indicators::LED3,
        Layer::Qwerty => Indicators::LED1.union(Indicators::LED3),
    }
}

/// Hardware side of the indicators.
pub trait IndicatorPanel {
    /// The board status LED on the left half
    fn board_led(&mut self, on: bool);
    /// Right-hand LED `index`, 1-based
    fn right_led(&mut self, index: u8, on: bool);
}

/// Turn every LED off, then light `set`.
pub fn apply_indicators<P: IndicatorPanel + ?Sized>(panel: &mut P, set: Indicators) {
    panel.board_led(false);
    for index in 1..=Indicators::COUNT {
        panel.right_led(index, false);
    }
    for index in set.lit() {
        panel.right_led(index, true);
    }
}

/// Tracks the layer last shown on the LEDs.
#[derive(Debug, Clone, Default)]
pub struct LayerObserver {
    current: Option<Layer>,
}

impl LayerObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layer currently shown, if any state has been observed yet
    pub fn current(&self) -> Option<Layer> {
        self.current
    }

    /// Feed the host's layer-state mask. Returns the new LED set only when
    /// the layer that drives the LEDs changed.
    pub fn on_layer_state(&mut self, state: u32) -> Option<Indicators> {
        let layer = Layer::from_state(state);
        if self.current == Some(layer) {
            return None;
        }
        log::debug!("layer {:?} -> {} (state {:#07b})", self.current, layer, state);
        self.current = Some(layer);
        Some(indicators_for(layer))
    }

    /// Re-evaluate unconditionally, as a per-scan hook would.
    pub fn force(&mut self, state: u32) -> Indicators {
        let layer = Layer::from_state(state);
        self.current = Some(layer);
        indicators_for(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[derive(Default)]
    struct Panel {
        board: bool,
        right: [bool; 3],
    }

    impl IndicatorPanel for Panel {
        fn board_led(&mut self, on: bool) {
            self.board = on;
        }

        fn right_led(&mut self, index: u8, on: bool) {
            self.right[usize::from(index - 1)] = on;
        }
    }

    #[test]
    fn test_indicators_for_layers() {
        assert_eq!(indicators_for(Layer::Base), Indicators::empty());
        assert_eq!(indicators_for(Layer::Symbols), Indicators::LED1);
        assert_eq!(indicators_for(Layer::Media), Indicators::LED2);
        assert_eq!(indicators_for(Layer::Navigation), Indicators::LED3);
        assert_eq!(indicators_for(Layer::Qwerty), Indicators::LED1 | Indicators::LED3);
    }

    #[test]
    fn test_lit_indices() {
        let set = Indicators::LED1 | Indicators::LED3;
        assert_eq!(set.lit().collect::<Vec<_>>(), vec![1, 3]);
        assert!(!set.is_lit(2));
        assert!(!set.is_lit(0));
        assert!(!set.is_lit(4));
    }

    #[test]
    fn test_apply_clears_previous_state() {
        let mut panel = Panel {
            board: true,
            right: [true, true, true],
        };
        apply_indicators(&mut panel, Indicators::LED2);
        assert!(!panel.board);
        assert_eq!(panel.right, [false, true, false]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        for layer in Layer::iter() {
            let mut once = Panel::default();
            apply_indicators(&mut once, indicators_for(layer));
            let mut twice = Panel::default();
            apply_indicators(&mut twice, indicators_for(layer));
            apply_indicators(&mut twice, indicators_for(layer));
            assert_eq!(once.right, twice.right);
            assert_eq!(once.board, twice.board);
        }
    }

    #[test]
    fn test_observer_reports_changes_only() {
        let mut observer = LayerObserver::new();
        assert_eq!(observer.on_layer_state(0), Some(Indicators::empty()));
        assert_eq!(observer.on_layer_state(1), None);
        assert_eq!(observer.on_layer_state(0b10), Some(Indicators::LED1));
        assert_eq!(observer.on_layer_state(0b11), None);
        assert_eq!(observer.current(), Some(Layer::Symbols));
        assert_eq!(observer.force(0b11), Indicators::LED1);
        assert_eq!(observer.on_layer_state(1 << 4), Some(Indicators::LED1 | Indicators::LED3));
    }
}
