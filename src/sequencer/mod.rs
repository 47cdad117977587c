mod scheduler;

pub use scheduler::{Sequencer, SETTLE_TICKS, STEPS_PER_BEAT};

use crate::clock::Ticks;

/// Where the sequencer (and the pads) send "make a sound" requests.
pub trait Triggers {
    fn trig_on(&mut self, pad: usize, step: usize);

    // samples are one-shot, so most sinks ignore this
    fn trig_off(&mut self, _pad: usize, _step: usize) {}

    /// Called with the current time on every scheduler and input poll.
    fn tick(&mut self, _now: Ticks) {}
}

/// On/off indicator outputs.
pub trait Leds {
    fn set(&mut self, index: usize, on: bool);
}

/// Sink that drops everything; the default when nothing is listening.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Triggers for Silent {
    fn trig_on(&mut self, _pad: usize, _step: usize) {}
}

impl Leds for Silent {
    fn set(&mut self, _index: usize, _on: bool) {}
}
