// Pattern data as the sequencer sees it.
//
// "step": one time slot, the smallest thing the scheduler plays.
// "pattern": a named grid of trigger flags, stored step-major:
//     steps[step][pad] == true  ->  pad fires on that step
// "bank": every pattern we have, plus which one is playing. The first
// pattern fixes the step and pad count for the whole bank.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: String,
    steps: Vec<Vec<bool>>,
}

impl Pattern {
    pub fn new(name: impl Into<String>, steps: Vec<Vec<bool>>) -> Result<Self> {
        let name = name.into();
        let num_pads = steps.first().map(Vec::len).unwrap_or(0);
        if num_pads == 0 {
            return Err(Error::InvalidParameter(format!("pattern '{name}' has no steps or pads")));
        }
        if let Some(bad) = steps.iter().position(|row| row.len() != num_pads) {
            return Err(Error::InvalidParameter(format!(
                "pattern '{name}' step {bad} has {} pads, expected {num_pads}",
                steps[bad].len()
            )));
        }
        Ok(Self { name, steps })
    }

    pub fn blank(name: impl Into<String>, num_steps: usize, num_pads: usize) -> Self {
        Self {
            name: name.into(),
            steps: vec![vec![false; num_pads]; num_steps],
        }
    }

    pub fn num_steps(&self) -> usize { self.steps.len() }
    pub fn num_pads(&self) -> usize { self.steps[0].len() }

    pub fn steps(&self) -> &[Vec<bool>] {
        &self.steps
    }

    pub fn row(&self, step: usize) -> &[bool] {
        &self.steps[step]
    }

    pub fn get(&self, step: usize, pad: usize) -> bool {
        self.steps
            .get(step)
            .and_then(|row| row.get(pad))
            .copied()
            .unwrap_or(false)
    }

    // Out of range is a caller bug: loud in debug builds, ignored in release.
    pub fn set(&mut self, step: usize, pad: usize, value: bool) {
        debug_assert!(step < self.num_steps(), "step {step} out of range");
        debug_assert!(pad < self.num_pads(), "pad {pad} out of range");
        if let Some(cell) = self.steps.get_mut(step).and_then(|row| row.get_mut(pad)) {
            *cell = value;
        }
    }

    pub fn clear_pad(&mut self, pad: usize) {
        debug_assert!(pad < self.num_pads(), "pad {pad} out of range");
        for row in &mut self.steps {
            if let Some(cell) = row.get_mut(pad) {
                *cell = false;
            }
        }
    }

    fn same_shape(&self, other: &Pattern) -> bool {
        self.num_steps() == other.num_steps() && self.num_pads() == other.num_pads()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternBank {
    patterns: Vec<Pattern>,
    active: usize,
}

impl PatternBank {
    pub fn new(patterns: Vec<Pattern>) -> Result<Self> {
        let Some(first) = patterns.first() else {
            return Err(Error::InvalidParameter("pattern bank is empty".into()));
        };
        if let Some(odd) = patterns.iter().find(|p| !p.same_shape(first)) {
            return Err(Error::InvalidParameter(format!(
                "pattern '{}' is {}x{}, bank is {}x{}",
                odd.name,
                odd.num_steps(),
                odd.num_pads(),
                first.num_steps(),
                first.num_pads()
            )));
        }
        Ok(Self { patterns, active: 0 })
    }

    pub fn single(pattern: Pattern) -> Self {
        Self { patterns: vec![pattern], active: 0 }
    }

    pub fn num_steps(&self) -> usize { self.patterns[0].num_steps() }
    pub fn num_pads(&self) -> usize { self.patterns[0].num_pads() }
    pub fn len(&self) -> usize { self.patterns.len() }
    pub fn active_index(&self) -> usize { self.active }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn active(&self) -> &Pattern {
        &self.patterns[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Pattern {
        &mut self.patterns[self.active]
    }

    /// Select a pattern by index, wrapping in both directions. Returns the
    /// index actually selected.
    pub fn select(&mut self, index: isize) -> usize {
        self.active = index.rem_euclid(self.patterns.len() as isize) as usize;
        self.active
    }

    /// Insert a copy of the active pattern right after it and select the copy.
    pub fn duplicate_active(&mut self) -> usize {
        let mut copy = self.active().clone();
        copy.name = format!("{}-copy", copy.name);
        self.active += 1;
        self.patterns.insert(self.active, copy);
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_of(n: usize) -> PatternBank {
        let patterns = (0..n).map(|i| Pattern::blank(format!("p{i}"), 16, 2)).collect();
        PatternBank::new(patterns).unwrap()
    }

    #[test]
    fn ragged_pattern_rejected() {
        let err = Pattern::new("bad", vec![vec![true, false], vec![true]]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(Pattern::new("none", vec![]).is_err());
        assert!(Pattern::new("no pads", vec![vec![]]).is_err());
    }

    #[test]
    fn bank_shape_fixed_by_first_pattern() {
        let patterns = vec![Pattern::blank("a", 16, 8), Pattern::blank("b", 32, 8)];
        assert!(matches!(PatternBank::new(patterns), Err(Error::InvalidParameter(_))));
        assert!(PatternBank::new(vec![]).is_err());
    }

    #[test]
    fn select_wraps_both_ways() {
        let mut bank = bank_of(3);
        assert_eq!(bank.select(4), 1);
        assert_eq!(bank.select(-1), 2);
        assert_eq!(bank.select(3), 0);
        assert_eq!(bank.active().name, "p0");
    }

    #[test]
    fn clear_pad_only_touches_that_pad() {
        let mut bank = bank_of(1);
        let pattern = bank.active_mut();
        for step in 0..16 {
            pattern.set(step, 0, true);
            pattern.set(step, 1, true);
        }
        pattern.clear_pad(1);
        assert!(pattern.steps().iter().all(|row| row[0] && !row[1]));
    }

    #[test]
    fn duplicate_inserts_after_active() {
        let mut bank = bank_of(2);
        bank.active_mut().set(3, 1, true);
        assert_eq!(bank.duplicate_active(), 1);
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.active().name, "p0-copy");
        assert!(bank.active().get(3, 1));
        assert_eq!(bank.patterns()[2].name, "p1");
    }
}
