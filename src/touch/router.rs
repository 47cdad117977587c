// Turns touch edges into sounds, pattern edits and transport commands.
//
// Record handling is a small state machine over two flags:
//
// - `record_held`: the record pad is physically down.
// - `record_mode`: latched; drum presses are written into the pattern.
//
// Tapping record alone toggles `record_mode`. Holding record while tapping
// drum pads erases those pads' rows instead, and the release of record then
// does not toggle anything.
//
// Within one poll all edges are computed from the same pair of samples,
// then applied in index order, so a drum pad (lower index) is handled
// before the record pad when both change in the same poll.

use tracing::{debug, info};

use super::edges::{self, Edge};
use crate::sequencer::{Leds, Sequencer, Triggers};
use crate::shared::{pad_to_led, Pad, LED_PLAY, LED_REC, NUM_INPUTS, WIRED_INPUTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordState {
    Idle,
    RecordHeld,
    RecordMode,
}

#[derive(Clone, Debug)]
pub struct Router {
    last_touches: Vec<bool>,
    record_mode: bool,
    record_held: bool,
    trig_pressed: bool, // a drum pad went down during this record hold
    chord_guard: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Router {
    pub fn new(chord_guard: bool) -> Self {
        Self {
            last_touches: vec![false; NUM_INPUTS],
            record_mode: false,
            record_held: false,
            trig_pressed: false,
            chord_guard,
        }
    }

    pub fn record_mode(&self) -> bool { self.record_mode }
    pub fn record_held(&self) -> bool { self.record_held }

    pub fn state(&self) -> RecordState {
        if self.record_held {
            RecordState::RecordHeld
        } else if self.record_mode {
            RecordState::RecordMode
        } else {
            RecordState::Idle
        }
    }

    /// Handle one touch sample.
    pub fn poll<T: Triggers + Leds>(&mut self, touches: &[bool], seq: &mut Sequencer<T>) {
        if self.chord_guard && is_bad_touch(touches) {
            debug!("chord guard: dropping touch sample");
            return;
        }
        if self.last_touches.len() != touches.len() {
            self.last_touches.resize(touches.len(), false);
        }

        let edges = edges::detect(&self.last_touches, touches);
        for (index, edge) in edges.into_iter().enumerate().take(WIRED_INPUTS) {
            match edge {
                Edge::Pressed => self.pressed(index, seq),
                Edge::Released => self.released(index, seq),
                Edge::NoChange => {}
            }
        }
        self.last_touches.copy_from_slice(touches);

        let playing = seq.is_playing();
        let leds = seq.triggers_mut();
        leds.set(LED_PLAY, playing);
        leds.set(LED_REC, self.record_mode || self.record_held);
    }

    fn pressed<T: Triggers + Leds>(&mut self, index: usize, seq: &mut Sequencer<T>) {
        if beyond_bank(index, seq) {
            return;
        }
        if let Some(led) = pad_to_led(index) {
            seq.triggers_mut().set(led, true);
        }
        let Some(pad) = Pad::from_index(index) else {
            return;
        };
        match pad {
            Pad::Drum(drum) => {
                if self.record_held {
                    self.trig_pressed = true;
                }
                if self.record_mode {
                    seq.set_trig(drum, true, None);
                }
                seq.trigger(drum);
            }
            Pad::Play => seq.toggle_play(),
            Pad::Stop => seq.stop(),
            Pad::Record => {
                self.record_held = true;
                self.trig_pressed = false;
            }
            Pad::PatternNext => {
                seq.next_pattern();
            }
            Pad::PatternPrev => {
                seq.prev_pattern();
            }
            Pad::Up | Pad::Mid | Pad::Down | Pad::Shift => {}
        }
    }

    fn released<T: Triggers + Leds>(&mut self, index: usize, seq: &mut Sequencer<T>) {
        if beyond_bank(index, seq) {
            return;
        }
        if let Some(led) = pad_to_led(index) {
            seq.triggers_mut().set(led, false);
        }
        match Pad::from_index(index) {
            Some(Pad::Drum(drum)) if self.record_held => seq.clear_trigs(drum),
            Some(Pad::Record) => {
                self.record_held = false;
                if self.trig_pressed {
                    self.trig_pressed = false;
                } else {
                    self.record_mode = !self.record_mode;
                    info!(record_mode = self.record_mode, "record mode");
                }
            }
            _ => {}
        }
    }
}

// A drum pad the loaded bank has no row for is treated as unwired.
fn beyond_bank<T: Triggers>(index: usize, seq: &Sequencer<T>) -> bool {
    matches!(Pad::from_index(index), Some(Pad::Drum(drum)) if drum >= seq.bank().num_pads())
}

// Touches the sensor reports when a hand lies across the control row
// rather than pressing one pad.
pub fn is_bad_touch(touches: &[bool]) -> bool {
    let on = |i: usize| touches.get(i).copied().unwrap_or(false);
    on(20)
        || (on(7) && on(8) && on(9))
        || (on(9) && on(10) && on(11))
        || (on(10) && on(11) && on(12))
}
