// Purely for testing: sinks that remember what they were asked to do.

use crate::audio_api::Voices;
use crate::clock::Ticks;
use crate::pipeline::pattern::{Pattern, PatternBank};
use crate::sequencer::{Leds, Triggers};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    On { pad: usize, step: usize },
    Off { pad: usize, step: usize },
}

#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub leds: Vec<bool>,
    pub last_tick: Option<Ticks>,
}

impl Recorder {
    pub fn ons(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                Event::On { pad, step } => Some((pad, step)),
                Event::Off { .. } => None,
            })
            .collect()
    }

    pub fn offs(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                Event::Off { pad, step } => Some((pad, step)),
                Event::On { .. } => None,
            })
            .collect()
    }

    pub fn led(&self, index: usize) -> bool {
        self.leds.get(index).copied().unwrap_or(false)
    }
}

impl Triggers for Recorder {
    fn trig_on(&mut self, pad: usize, step: usize) {
        self.events.push(Event::On { pad, step });
    }

    fn trig_off(&mut self, pad: usize, step: usize) {
        self.events.push(Event::Off { pad, step });
    }

    fn tick(&mut self, now: Ticks) {
        self.last_tick = Some(now);
    }
}

impl Leds for Recorder {
    fn set(&mut self, index: usize, on: bool) {
        if self.leds.len() <= index {
            self.leds.resize(index + 1, false);
        }
        self.leds[index] = on;
    }
}

#[derive(Clone, Debug, Default)]
pub struct VoiceLog {
    pub played: Vec<usize>,
    pub stopped: Vec<usize>,
}

impl Voices for VoiceLog {
    fn play(&mut self, voice: usize) {
        self.played.push(voice);
    }

    fn stop(&mut self, voice: usize) {
        self.stopped.push(voice);
    }
}

pub fn blank_bank(patterns: usize, steps: usize, pads: usize) -> PatternBank {
    let patterns = (0..patterns)
        .map(|i| Pattern::blank(format!("p{i}"), steps, pads))
        .collect();
    PatternBank::new(patterns).unwrap()
}
