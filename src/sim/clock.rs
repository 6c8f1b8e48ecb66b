//! Fixed-timestep simulation clock
//!
//! Converts variable frame deltas into a whole number of constant-size ticks.
//! Leftover time, including fractions of a microsecond, carries over to the
//! next frame, so the tick count only depends on the total elapsed time and
//! never on how that time was split across frames.

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_MS};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Leftover time not yet consumed by a tick (microseconds)
    accumulated_us: f64,
    /// Whole microseconds per tick
    fixed_step_us: f64,
    max_frame_us: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(FIXED_STEP_MS, MAX_FRAME_MS)
    }
}

impl SimulationClock {
    pub fn new(fixed_step_ms: f64, max_frame_ms: f64) -> Self {
        Self {
            accumulated_us: 0.0,
            fixed_step_us: ms_to_us(fixed_step_ms).round().max(1.0),
            max_frame_us: ms_to_us(max_frame_ms),
        }
    }

    /// Feed elapsed wall time and return how many fixed ticks are due.
    ///
    /// Negative or non-finite deltas count as zero; deltas longer than the
    /// frame clamp (a backgrounded tab, a debugger pause) are truncated.
    pub fn advance(&mut self, raw_delta_ms: f64) -> u32 {
        self.accumulated_us += ms_to_us(raw_delta_ms).min(self.max_frame_us);

        let ticks = (self.accumulated_us / self.fixed_step_us).floor();
        self.accumulated_us = (self.accumulated_us - ticks * self.fixed_step_us).max(0.0);
        ticks as u32
    }

    /// Drop any leftover time
    pub fn reset(&mut self) {
        self.accumulated_us = 0.0;
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_us / 1000.0
    }

    pub fn fixed_step_ms(&self) -> f64 {
        self.fixed_step_us / 1000.0
    }
}

fn ms_to_us(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms * 1000.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_consumes_whole_steps() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.advance(10.0), 1);
        assert!((clock.accumulated_ms() - 3.333).abs() < 1e-9);
        assert!(clock.accumulated_ms() < clock.fixed_step_ms());
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut clock = SimulationClock::default();
        // A 5 second stall only produces 250ms of catch-up
        let ticks = clock.advance(5000.0);
        assert_eq!(ticks, 14);
        assert!(clock.accumulated_ms() < clock.fixed_step_ms());
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(-40.0), 0);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.advance(f64::INFINITY), 0);
        assert_eq!(clock.accumulated_ms(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::default();
        clock.advance(12.0);
        clock.reset();
        assert_eq!(clock.accumulated_ms(), 0.0);
    }

    #[test]
    fn test_one_long_frame_matches_many_short_frames() {
        let mut one = SimulationClock::default();
        let mut many = SimulationClock::default();

        let single = one.advance(100.0);
        let split: u32 = (0..10).map(|_| many.advance(10.0)).sum();

        assert_eq!(single, 5);
        assert_eq!(single, split);
        assert_eq!(one, many);
    }

    #[test]
    fn test_fractional_deltas_split_like_one_frame() {
        let mut one = SimulationClock::default();
        let mut two = SimulationClock::default();
        assert_eq!(one.advance(16.6668), two.advance(8.3334) + two.advance(8.3334));

        let mut one = SimulationClock::default();
        let mut two = SimulationClock::default();
        let single = one.advance(16.6672);
        assert_eq!(single, 1);
        assert_eq!(single, two.advance(8.3336) + two.advance(8.3336));
    }

    #[test]
    fn test_tiny_deltas_are_not_lost() {
        let mut clock = SimulationClock::default();
        for _ in 0..1000 {
            clock.advance(0.0004);
        }
        assert!((clock.accumulated_ms() - 0.4).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_tick_count_independent_of_split(
            deltas in prop::collection::vec(0.0f64..250.0, 1..64),
        ) {
            let mut clock = SimulationClock::default();
            let mut halves = SimulationClock::default();
            let mut ticks = 0u64;
            let mut split_ticks = 0u64;
            for d in &deltas {
                ticks += clock.advance(*d) as u64;
                split_ticks += halves.advance(d / 2.0) as u64;
                split_ticks += halves.advance(d - d / 2.0) as u64;
            }

            let total_us: f64 = deltas.iter().map(|d| d * 1000.0).sum();
            prop_assert_eq!(ticks, (total_us / 16_667.0).floor() as u64);
            prop_assert_eq!(ticks, split_ticks);
            prop_assert!(clock.accumulated_ms() < clock.fixed_step_ms());
        }
    }
}
