pub mod grid;
pub mod input;
pub mod view;

use crate::sequencer::Leds;
use crate::shared::NUM_LEDS;

/// The LED row as drawn on screen.
#[derive(Clone, Debug, Default)]
pub struct LedPanel {
    lit: [bool; NUM_LEDS],
}

impl LedPanel {
    pub fn lit(&self) -> &[bool; NUM_LEDS] {
        &self.lit
    }
}

impl Leds for LedPanel {
    fn set(&mut self, index: usize, on: bool) {
        if let Some(led) = self.lit.get_mut(index) {
            *led = on;
        }
    }
}
