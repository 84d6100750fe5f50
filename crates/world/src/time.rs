//! Deterministic simulation clock.
//!
//! Frame deltas are clamped so that a stalled frame never integrates a large catch-up step.

use serde::{Deserialize, Serialize};
use voxfarm_core::SimTick;

/// Simulation time state: tick counter plus monotonic elapsed seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulation tick.
    pub tick: SimTick,
    /// Seconds simulated so far.
    pub elapsed: f64,
    /// Largest delta a single tick may take.
    pub max_dt: f64,
}

impl SimClock {
    /// Create a new clock starting at tick 0.
    pub fn new(max_dt: f64) -> Self {
        Self {
            tick: SimTick::ZERO,
            elapsed: 0.0,
            max_dt,
        }
    }

    /// Advance by one tick of `raw_dt` seconds. Returns the clamped delta actually applied.
    pub fn advance(&mut self, raw_dt: f64) -> f64 {
        let dt = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        };
        self.tick = self.tick.advance(1);
        self.elapsed += dt;
        dt
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_large_steps() {
        let mut clock = SimClock::default();
        assert_eq!(clock.advance(1.0), 0.05);
        assert_eq!(clock.tick, SimTick(1));
        assert_eq!(clock.elapsed, 0.05);
    }

    #[test]
    fn ignores_negative_and_nan() {
        let mut clock = SimClock::default();
        assert_eq!(clock.advance(-0.5), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.tick, SimTick(2));
        assert_eq!(clock.elapsed, 0.0);
    }

    #[test]
    fn small_steps_pass_through() {
        let mut clock = SimClock::new(0.1);
        clock.advance(0.016);
        clock.advance(0.016);
        assert!((clock.elapsed - 0.032).abs() < 1e-12);
    }
}
