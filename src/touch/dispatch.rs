// The boundary between the sequencing core and the hardware: trigger requests
// become "play voice N" plus a pad light that goes out on its own.
use tracing::trace;

use crate::audio_api::Voices;
use crate::clock::{ticks_diff, Ticks};
use crate::sequencer::{Leds, Triggers};
use crate::shared::{pad_to_led, NUM_DRUM_PADS};

pub struct Dispatcher<V: Voices, L: Leds> {
    voices: V,
    leds: L,
    lit_at: Vec<Option<Ticks>>, // when each pad's light was last switched on by a trigger
    lit_for: i32,
    choke: bool,
    now: Ticks,
}

impl<V: Voices, L: Leds> Dispatcher<V, L> {
    pub fn new(voices: V, leds: L, num_pads: usize, pad_lit_ms: u32) -> Self {
        Self {
            voices,
            leds,
            lit_at: vec![None; num_pads],
            lit_for: pad_lit_ms.min(i32::MAX as u32) as i32,
            choke: false,
            now: 0,
        }
    }

    /// Stop a pad's voice when its sequenced trigger is released.
    pub fn with_choke(mut self, choke: bool) -> Self {
        self.choke = choke;
        self
    }

    pub fn voices(&self) -> &V {
        &self.voices
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }
}

impl<V: Voices, L: Leds> Triggers for Dispatcher<V, L> {
    fn trig_on(&mut self, pad: usize, step: usize) {
        trace!(pad, step, "play");
        self.voices.play(pad);
        if let Some(led) = drum_led(pad) {
            self.leds.set(led, true);
        }
        if let Some(lit) = self.lit_at.get_mut(pad) {
            *lit = Some(self.now);
        }
    }

    fn trig_off(&mut self, pad: usize, _step: usize) {
        if self.choke {
            self.voices.stop(pad);
        }
    }

    // turn off pad lights that have been on long enough
    fn tick(&mut self, now: Ticks) {
        self.now = now;
        for (pad, lit) in self.lit_at.iter_mut().enumerate() {
            let Some(since) = *lit else { continue };
            if ticks_diff(now, since) >= self.lit_for {
                *lit = None;
                if let Some(led) = drum_led(pad) {
                    self.leds.set(led, false);
                }
            }
        }
    }
}

impl<V: Voices, L: Leds> Leds for Dispatcher<V, L> {
    fn set(&mut self, index: usize, on: bool) {
        self.leds.set(index, on);
    }
}

// Pads past the drum row have no light of their own; the touch index with the
// same number is a transport control.
fn drum_led(pad: usize) -> Option<usize> {
    if pad < NUM_DRUM_PADS { pad_to_led(pad) } else { None }
}

#[cfg(test)]
impl<V: Voices, L: Leds> Dispatcher<V, L> {
    pub fn is_lit(&self, pad: usize) -> bool {
        self.lit_at.get(pad).is_some_and(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixture::{Recorder, VoiceLog};

    fn dispatcher() -> Dispatcher<VoiceLog, Recorder> {
        Dispatcher::new(VoiceLog::default(), Recorder::default(), 8, 100)
    }

    #[test]
    fn trigger_plays_and_lights() {
        let mut d = dispatcher();
        d.tick(1000);
        d.trig_on(3, 0);
        assert_eq!(d.voices().played, vec![3]);
        assert!(d.leds().led(3));
        assert!(d.is_lit(3));
    }

    #[test]
    fn light_goes_out_after_its_time() {
        let mut d = dispatcher();
        d.tick(1000);
        d.trig_on(1, 0);
        d.tick(1099);
        assert!(d.leds().led(1));
        d.tick(1100);
        assert!(!d.leds().led(1));
        assert!(!d.is_lit(1));
    }

    #[test]
    fn light_timer_survives_tick_wrap() {
        let mut d = dispatcher();
        let start = u32::MAX - 10;
        d.tick(start);
        d.trig_on(0, 0);
        d.tick(start.wrapping_add(50));
        assert!(d.leds().led(0));
        d.tick(start.wrapping_add(100));
        assert!(!d.leds().led(0));
    }

    #[test]
    fn retrigger_restarts_light() {
        let mut d = dispatcher();
        d.tick(0);
        d.trig_on(2, 0);
        d.tick(80);
        d.trig_on(2, 1);
        d.tick(150);
        assert!(d.leds().led(2));
        d.tick(180);
        assert!(!d.leds().led(2));
    }

    #[test]
    fn trig_off_is_silent_unless_choking() {
        let mut d = dispatcher();
        d.trig_off(4, 0);
        assert!(d.voices().stopped.is_empty());

        let mut d = dispatcher().with_choke(true);
        d.trig_off(4, 0);
        assert_eq!(d.voices().stopped, vec![4]);
    }

    #[test]
    fn wide_bank_pads_leave_transport_leds_alone() {
        let mut d = Dispatcher::new(VoiceLog::default(), Recorder::default(), 11, 100);
        d.set(crate::shared::LED_PLAY, true);
        d.tick(0);
        d.trig_on(9, 0);
        d.trig_on(10, 0);
        assert_eq!(d.voices().played, vec![9, 10]);
        assert!(!d.leds().led(crate::shared::LED_REC));

        d.tick(200);
        assert!(d.leds().led(crate::shared::LED_PLAY));
    }
}
