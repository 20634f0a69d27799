//! Logical simulation clock.
//!
//! Time is derived from the completed step count (`steps * step`) rather than
//! accumulated, so long runs with fractional steps do not drift.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SimulationClock {
    /// Current logical time in seconds.
    pub time: f64,
    /// Fixed step size in seconds.
    pub step: f64,
    /// The loop runs while `time < max_time`.
    pub max_time: f64,
    /// Completed steps.
    pub steps: u64,
}

impl SimulationClock {
    pub fn new(step: f64, max_time: f64) -> Self {
        Self {
            time: 0.0,
            step,
            max_time,
            steps: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.max_time
    }

    /// Advance by exactly one step.
    pub fn advance(&mut self) {
        self.steps += 1;
        self.time = self.steps as f64 * self.step;
    }

    /// Fraction of `max_time` elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.max_time <= 0.0 {
            return 1.0;
        }
        (self.time / self.max_time).clamp(0.0, 1.0)
    }
}
