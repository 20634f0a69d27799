// ---------------------------------------------------------------------------
// SimError: run-level failures
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that reject a run before any state is created, plus report
/// encoding failures.
///
/// Trains denied a block or referencing unknown stations never produce an
/// error; those are part of normal step execution.
#[derive(Debug)]
pub enum SimError {
    /// The network has no stations and no blocks.
    EmptyNetwork,
    /// The step size is zero, negative or not finite.
    InvalidTimeStep(f64),
    /// The maximum logical duration is negative or not finite.
    InvalidMaxTime(f64),
    /// A train with this identifier is already registered.
    DuplicateTrain(String),
    /// Encoding a run report failed.
    Encode(String),
    /// Decoding a run report or configuration failed.
    Decode(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyNetwork => write!(f, "Network has no stations or blocks"),
            SimError::InvalidTimeStep(step) => {
                write!(f, "Invalid time step {step}: must be finite and positive")
            }
            SimError::InvalidMaxTime(max) => {
                write!(f, "Invalid max time {max}: must be finite and non-negative")
            }
            SimError::DuplicateTrain(id) => write!(f, "Train {id} is already registered"),
            SimError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SimError::Decode(msg) => write!(f, "Decoding error: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<bitcode::Error> for SimError {
    fn from(e: bitcode::Error) -> Self {
        SimError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_time_step() {
        let msg = format!("{}", SimError::InvalidTimeStep(0.0));
        assert!(msg.contains("Invalid time step"), "got: {msg}");
        assert!(msg.contains('0'), "got: {msg}");
    }

    #[test]
    fn test_display_empty_network() {
        let msg = format!("{}", SimError::EmptyNetwork);
        assert!(msg.contains("no stations"), "got: {msg}");
    }

    #[test]
    fn test_display_duplicate_train() {
        let msg = format!("{}", SimError::DuplicateTrain("T1".to_string()));
        assert!(msg.contains("T1"), "got: {msg}");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SimError = json_err.into();
        assert!(matches!(err, SimError::Decode(_)));
    }

    #[test]
    fn test_is_error_trait() {
        let err = SimError::InvalidMaxTime(-1.0);
        assert!(std::error::Error::source(&err).is_none());
    }
}
