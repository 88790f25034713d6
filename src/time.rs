//! Fixed-timestep regeneration clock using an accumulator pattern.
//!
//! Frame-driven hosts call `update()` with a wall-clock timestamp at whatever
//! rate they render. `RegenClock` converts this into a whole number of
//! regeneration ticks, carrying the remainder to the next frame, so the pool
//! refills at the configured interval regardless of frame rate.

use crate::config::SchedulerConfig;

pub struct RegenClock {
    /// Milliseconds per regeneration tick.
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
    /// Idle delay still to elapse before ticks start.
    pending_delay: Option<f64>,
    /// False while a delayed-start clock waits for its first tap.
    armed: bool,
}

impl RegenClock {
    pub fn new(config: &SchedulerConfig) -> Self {
        let start_delay = config.start_delay.map(|d| d.as_secs_f64() * 1000.0);
        Self {
            ms_per_tick: (config.interval.as_secs_f64() * 1000.0).max(1.0),
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
            pending_delay: start_delay,
            armed: start_delay.is_none(),
        }
    }

    /// Start a delayed-start clock. Later calls are ignored.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_running(&self) -> bool {
        self.armed && self.pending_delay.is_none()
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of regeneration ticks to apply this frame.
    ///
    /// There is no upper clamp on the frame delta: regeneration saturates at
    /// capacity, so a long gap is caught up with a single `tick_many`.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let mut delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        if !self.armed {
            return 0;
        }
        if let Some(remaining) = self.pending_delay {
            if delta < remaining {
                self.pending_delay = Some(remaining - delta);
                return 0;
            }
            delta -= remaining;
            self.pending_delay = None;
        }

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick).min(u32::MAX as f64) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}
