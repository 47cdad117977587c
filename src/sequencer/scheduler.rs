// Step scheduler: turns a free-running millisecond clock into sequencer steps.
//
// `Sequencer::advance` is meant to be called far more often than once per
// step (every millisecond or so). Each call either
//
// - crosses a step boundary: plays the active pattern's row at the current
//   position (if playing) and moves to the next step, or
// - sits between boundaries: once a couple of ticks have passed since the
//   last boundary, releases whatever the previous step triggered.
//
// When a boundary is noticed late, the next step is measured from halfway
// between the ideal boundary and now, so a slow poll loop pulls the tempo
// back instead of compounding its lateness into every following step.

use tracing::{debug, info, trace};

use super::{Silent, Triggers};
use crate::clock::{ticks_add, ticks_diff, Ticks};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pipeline::pattern::PatternBank;

pub const STEPS_PER_BEAT: u32 = 8; // 32nd notes in 4/4
pub const SETTLE_TICKS: u32 = 2;

pub struct Sequencer<T: Triggers = Silent> {
    bank: PatternBank,
    triggers: T,
    steps_per_beat: u32,
    settle_ticks: i32,
    bpm: f32,
    step_ticks: u32,
    last_step: Ticks,
    pos: usize,
    playing: bool,
    triggered: Vec<bool>, // pads the scheduler turned on and has not released yet
}

impl<T: Triggers> Sequencer<T> {
    pub fn from_config(config: &Config, bank: PatternBank, triggers: T, now: Ticks) -> Result<Self> {
        Self::with_timing(
            config.bpm,
            config.steps_per_beat,
            config.settle_ticks,
            bank,
            triggers,
            now,
        )
    }

    fn with_timing(
        bpm: f32,
        steps_per_beat: u32,
        settle_ticks: u32,
        bank: PatternBank,
        triggers: T,
        now: Ticks,
    ) -> Result<Self> {
        if steps_per_beat == 0 {
            return Err(Error::InvalidParameter("steps_per_beat must be at least 1".into()));
        }
        let num_pads = bank.num_pads();
        let mut seq = Self {
            bank,
            triggers,
            steps_per_beat,
            settle_ticks: settle_ticks.min(i32::MAX as u32) as i32,
            bpm: 0.0,
            step_ticks: 0,
            last_step: now,
            pos: 0,
            playing: false,
            triggered: vec![false; num_pads],
        };
        seq.set_bpm(bpm)?;
        Ok(seq)
    }

    /// Set the tempo. Step length is `60_000 / bpm / steps_per_beat` ticks,
    /// rounded down. Phase is kept: the next boundary is measured from the
    /// last one with the new length.
    pub fn set_bpm(&mut self, bpm: f32) -> Result<()> {
        if !(bpm > 0.0 && bpm.is_finite()) {
            return Err(Error::InvalidParameter(format!("tempo must be positive, got {bpm}")));
        }
        let step = (60_000.0 / bpm as f64 / self.steps_per_beat as f64).floor();
        if step < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "tempo {bpm} is faster than one step per tick"
            )));
        }
        if step > i32::MAX as f64 {
            return Err(Error::InvalidParameter(format!("tempo {bpm} is too slow")));
        }
        self.bpm = bpm;
        self.step_ticks = step as u32;
        debug!(bpm, step_ticks = self.step_ticks, "tempo set");
        Ok(())
    }

    /// Run the scheduler for time `now`. Returns the step that was evaluated
    /// when a boundary was crossed.
    pub fn advance(&mut self, now: Ticks) -> Option<usize> {
        self.triggers.tick(now);

        let elapsed = ticks_diff(now, self.last_step);
        let step_ticks = self.step_ticks as i32;
        if elapsed < step_ticks {
            if elapsed > self.settle_ticks {
                self.release_triggered();
            }
            return None;
        }

        let late = elapsed - step_ticks;
        self.last_step = ticks_add(now, -(late / 2)); // make half of it up on the next step

        let step = self.pos;
        if self.playing {
            for (pad, &on) in self.bank.active().row(step).iter().enumerate() {
                if on {
                    trace!(pad, step, "trig on");
                    self.triggers.trig_on(pad, step);
                    self.triggered[pad] = true;
                }
            }
        }
        self.pos = (self.pos + 1) % self.bank.num_steps();
        Some(step)
    }

    fn release_triggered(&mut self) {
        for (pad, fired) in self.triggered.iter_mut().enumerate() {
            if *fired {
                self.triggers.trig_off(pad, self.pos);
                *fired = false;
            }
        }
    }

    /// Fire a pad right now, outside the pattern (live playing).
    pub fn trigger(&mut self, pad: usize) {
        self.triggers.trig_on(pad, self.pos);
    }

    /// Write a trig into the active pattern. With no explicit step it lands on
    /// the current position, or one step back while playing: by the time a
    /// player reacts to what they hear, the position has already moved on.
    /// Returns the step written.
    pub fn set_trig(&mut self, pad: usize, value: bool, step: Option<usize>) -> usize {
        let num_steps = self.bank.num_steps();
        let step = match step {
            Some(step) => step,
            None if self.playing => (self.pos + num_steps - 1) % num_steps,
            None => self.pos,
        };
        self.bank.active_mut().set(step, pad, value);
        debug!(pad, step, value, "set trig");
        step
    }

    /// Erase a pad across every step of the active pattern.
    pub fn clear_trigs(&mut self, pad: usize) {
        self.bank.active_mut().clear_pad(pad);
        info!(pad, "cleared pad");
    }

    pub fn change_pattern(&mut self, index: isize) -> usize {
        let index = self.bank.select(index);
        info!(index, name = %self.bank.active().name, "pattern");
        index
    }

    pub fn next_pattern(&mut self) -> usize {
        self.change_pattern(self.bank.active_index() as isize + 1)
    }

    pub fn prev_pattern(&mut self) -> usize {
        self.change_pattern(self.bank.active_index() as isize - 1)
    }

    pub fn duplicate_pattern(&mut self) -> usize {
        let index = self.bank.duplicate_active();
        info!(index, name = %self.bank.active().name, "duplicated pattern");
        index
    }

    pub fn play(&mut self) {
        self.playing = true;
        info!("play");
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        info!(playing = self.playing, "toggle play");
    }

    /// Stop and rewind to the first step.
    pub fn stop(&mut self) {
        self.playing = false;
        self.pos = 0;
        info!("stop");
    }

    /// True on the first step of each beat (tempo light).
    pub fn at_beat(&self) -> bool {
        self.pos % self.steps_per_beat as usize == 0
    }

    pub fn is_playing(&self) -> bool { self.playing }
    pub fn position(&self) -> usize { self.pos }
    pub fn bpm(&self) -> f32 { self.bpm }
    pub fn bank(&self) -> &PatternBank {
        &self.bank
    }

    pub fn triggers(&self) -> &T {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut T {
        &mut self.triggers
    }
}

#[cfg(test)]
impl<T: Triggers> Sequencer<T> {
    pub fn new(bpm: f32, bank: PatternBank, triggers: T, now: Ticks) -> Result<Self> {
        Self::with_timing(bpm, STEPS_PER_BEAT, SETTLE_TICKS, bank, triggers, now)
    }

    pub fn step_ticks(&self) -> u32 { self.step_ticks }
    pub fn last_step(&self) -> Ticks { self.last_step }

    pub fn is_triggered(&self, pad: usize) -> bool {
        self.triggered.get(pad).copied().unwrap_or(false)
    }
}
