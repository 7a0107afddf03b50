//! Fixed-interval scheduler for the 1Hz telemetry cadence.
//!
//! Telemetry runs at one fixed rate; immediate out-of-band emission for
//! faults is handled separately in the control loop task.

use embassy_time::{Duration, Instant};

pub struct IntervalScheduler {
    interval: Duration,
    last_fire: Instant,
    enabled: bool,
}

impl IntervalScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last_fire: Instant::now(),
            enabled: true,
        }
    }

    pub fn hz1() -> Self {
        Self::new(1000)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.last_fire = Instant::now();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn should_fire(&mut self) -> bool {
        if !self.enabled {
            return false;
        }

        let now = Instant::now();
        let elapsed = now - self.last_fire;

        if elapsed >= self.interval {
            self.last_fire = now;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_fire = Instant::now();
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::hz1()
    }
}
