//! Engine constants and the per-run configuration.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arbitration::ArbitrationPolicy;
use crate::error::SimError;

// =============================================================================
// Constants
// =============================================================================

/// Default logical step size in seconds.
pub const DEFAULT_TIME_STEP: f64 = 1.0;

/// Acceleration applied to a moving train each step, in m/s².
pub const DEFAULT_ACCELERATION_MS2: f64 = 1.0;

/// Conversion factor from m/s to km/h.
pub const KMH_PER_MS: f64 = 3.6;

/// Dwell time of a platform when none is given, in seconds.
pub const DEFAULT_DWELL_TIME: f64 = 60.0;

/// Junction switching latency when none is given, in seconds.
pub const DEFAULT_SWITCHING_TIME: f64 = 30.0;

/// Default top speed of a train in km/h.
pub const DEFAULT_MAX_SPEED_KMH: f64 = 120.0;

/// Default physical train length in metres.
pub const DEFAULT_TRAIN_LENGTH_M: f64 = 200.0;

/// Default passenger capacity of a train.
pub const DEFAULT_TRAIN_CAPACITY: u32 = 500;

/// Default conflict priority (higher wins).
pub const DEFAULT_PRIORITY: i32 = 1;

/// Default passenger/train capacity of a station.
pub const DEFAULT_STATION_CAPACITY: u32 = 100;

// =============================================================================
// RunConfig
// =============================================================================

/// Parameters of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Logical duration of the run in seconds. The loop stops once the clock
    /// reaches this value.
    pub max_time: f64,
    /// Fixed step size in seconds.
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Rule used to pick a winner among trains contending for a block.
    #[serde(default)]
    pub policy: ArbitrationPolicy,
}

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_time: 3600.0,
            time_step: DEFAULT_TIME_STEP,
            policy: ArbitrationPolicy::default(),
        }
    }
}

impl RunConfig {
    pub fn new(max_time: f64) -> Self {
        Self {
            max_time,
            ..Default::default()
        }
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_policy(mut self, policy: ArbitrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Select the policy by its external name. Unrecognised names fall back
    /// to [`ArbitrationPolicy::Priority`].
    pub fn with_policy_name(mut self, name: &str) -> Self {
        self.policy = ArbitrationPolicy::from_name(name).unwrap_or_else(|| {
            warn!(
                "Unknown arbitration policy '{}', falling back to '{}'",
                name,
                ArbitrationPolicy::Priority.name()
            );
            ArbitrationPolicy::Priority
        });
        self
    }

    /// Parse a run configuration from JSON. `time_step` and `policy` are
    /// optional.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configurations that would corrupt the clock.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SimError::InvalidTimeStep(self.time_step));
        }
        if !self.max_time.is_finite() || self.max_time < 0.0 {
            return Err(SimError::InvalidMaxTime(self.max_time));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
        assert_eq!(config.policy, ArbitrationPolicy::Priority);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_policy_name_falls_back_to_priority() {
        let config = RunConfig::new(10.0).with_policy_name("round_robin");
        assert_eq!(config.policy, ArbitrationPolicy::Priority);
    }

    #[test]
    fn test_known_policy_names() {
        assert_eq!(
            RunConfig::new(10.0).with_policy_name("fifo").policy,
            ArbitrationPolicy::Fifo
        );
        assert_eq!(
            RunConfig::new(10.0).with_policy_name("first_come").policy,
            ArbitrationPolicy::FirstCome
        );
    }

    #[test]
    fn test_zero_time_step_rejected() {
        let config = RunConfig::new(10.0).with_time_step(0.0);
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidTimeStep(_))
        ));
    }

    #[test]
    fn test_negative_and_nan_max_time_rejected() {
        assert!(matches!(
            RunConfig::new(-1.0).validate(),
            Err(SimError::InvalidMaxTime(_))
        ));
        assert!(matches!(
            RunConfig::new(f64::NAN).validate(),
            Err(SimError::InvalidMaxTime(_))
        ));
    }

    #[test]
    fn test_from_json_defaults() {
        let config = RunConfig::from_json(r#"{"max_time": 120.0}"#).unwrap();
        assert_eq!(config.max_time, 120.0);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
        assert_eq!(config.policy, ArbitrationPolicy::Priority);
    }

    #[test]
    fn test_from_json_with_policy() {
        let config =
            RunConfig::from_json(r#"{"max_time": 60, "time_step": 5, "policy": "first_come"}"#)
                .unwrap();
        assert_eq!(config.time_step, 5.0);
        assert_eq!(config.policy, ArbitrationPolicy::FirstCome);
    }

    #[test]
    fn test_from_json_malformed() {
        let err = RunConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, SimError::Decode(_)), "got: {err}");
    }
}
