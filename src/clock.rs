// Millisecond tick counter that wraps at 32 bits.
//
// All comparisons go through `ticks_diff` so a wrap between two readings
// still produces the right (small) difference.

use std::time::Instant;

pub type Ticks = u32;

/// Signed distance from `earlier` to `later`, modulo 2^32.
#[inline]
pub fn ticks_diff(later: Ticks, earlier: Ticks) -> i32 {
    later.wrapping_sub(earlier) as i32
}

#[inline]
pub fn ticks_add(ticks: Ticks, delta: i32) -> Ticks {
    ticks.wrapping_add(delta as u32)
}

pub trait TickSource {
    fn now(&self) -> Ticks;
}

#[derive(Clone, Copy, Debug)]
pub struct MonotonicTicks {
    start: Instant,
}

impl MonotonicTicks {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicTicks {
    fn now(&self) -> Ticks {
        // truncation is the wrap
        self.start.elapsed().as_millis() as Ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_across_wrap() {
        let before = u32::MAX - 5;
        let after = ticks_add(before, 10);
        assert_eq!(after, 4);
        assert_eq!(ticks_diff(after, before), 10);
        assert_eq!(ticks_diff(before, after), -10);
    }

    #[test]
    fn add_negative() {
        assert_eq!(ticks_add(3, -5), u32::MAX - 1);
        assert_eq!(ticks_add(100, -40), 60);
    }

    #[test]
    fn monotonic_source_moves_forward() {
        let clock = MonotonicTicks::new();
        let a = clock.now();
        let b = clock.now();
        assert!(ticks_diff(b, a) >= 0);
    }
}
