//! Monotonic time source used to schedule the dispatcher cooldown

use std::time::Instant;

/// Supplies a monotonic "now" in seconds. The dispatcher only ever compares
/// values from the same clock, so the epoch is arbitrary.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Clock backed by [`Instant`], measuring seconds since construction.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
