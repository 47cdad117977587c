// The middle layer: owns the sequencer and the touch router and is the only
// thing that mutates them. The shell calls `advance` from its fast loop and
// `poll_touch` from its slower input loop, both on the same thread.
use crate::audio_api::Voices;
use crate::clock::Ticks;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::pattern::PatternBank;
use crate::sequencer::{Leds, Sequencer, Triggers};
use crate::touch::{Dispatcher, Router};

pub struct Middle<V: Voices, L: Leds> {
    seq: Sequencer<Dispatcher<V, L>>,
    router: Router,
}

impl<V: Voices, L: Leds> Middle<V, L> {
    pub fn new(config: &Config, bank: PatternBank, voices: V, leds: L, now: Ticks) -> Result<Self> {
        let dispatcher = Dispatcher::new(voices, leds, bank.num_pads(), config.pad_lit_ms)
            .with_choke(config.choke_on_release);
        let mut seq = Sequencer::from_config(config, bank, dispatcher, now)?;
        seq.change_pattern(config.start_pattern);
        if config.start_playing {
            seq.play();
        }
        Ok(Self { seq, router: Router::new(config.chord_guard) })
    }

    pub fn advance(&mut self, now: Ticks) -> Option<usize> {
        self.seq.advance(now)
    }

    pub fn poll_touch(&mut self, now: Ticks, touches: &[bool]) {
        self.seq.triggers_mut().tick(now);
        self.router.poll(touches, &mut self.seq);
    }

    pub fn duplicate_pattern(&mut self) -> usize {
        self.seq.duplicate_pattern()
    }

    pub fn sequencer(&self) -> &Sequencer<Dispatcher<V, L>> {
        &self.seq
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn bank(&self) -> &PatternBank {
        self.seq.bank()
    }

    pub fn leds(&self) -> &L {
        self.seq.triggers().leds()
    }

    pub fn voices(&self) -> &V {
        self.seq.triggers().voices()
    }
}
