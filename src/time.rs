//! Time sources for rate limiting.
//!
//! Delays never block; a task reads the current time once per tick and
//! compares. Production code uses the wall clock, tests advance a manual
//! clock by hand.

use std::cell::Cell;
use std::time::Instant;

pub trait TimeKeeper {
    /// The current time in seconds. The origin is arbitrary; only
    /// differences matter.
    fn time_now(&self) -> f64;
}

/// Monotonic wall clock time since construction.
pub struct WallClockTimeKeeper {
    epoch: Instant,
}

impl WallClockTimeKeeper {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for WallClockTimeKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeKeeper for WallClockTimeKeeper {
    fn time_now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to. For tests.
#[derive(Default)]
pub struct ManualTimeKeeper {
    time: Cell<f64>,
}

impl ManualTimeKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta: f64) {
        self.time.set(self.time.get() + delta);
    }

    pub fn reset(&self) {
        self.time.set(0.0);
    }
}

impl TimeKeeper for ManualTimeKeeper {
    fn time_now(&self) -> f64 {
        self.time.get()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn manual_clock_moves_on_demand() {
        let clock = ManualTimeKeeper::new();
        assert_eq!(clock.time_now(), 0.0);
        clock.advance(1.5);
        clock.advance(0.5);
        assert_eq!(clock.time_now(), 2.0);
        clock.reset();
        assert_eq!(clock.time_now(), 0.0);
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClockTimeKeeper::new();
        let a = clock.time_now();
        let b = clock.time_now();
        assert!(b >= a);
    }
}
