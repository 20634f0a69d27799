//! Fixed-step rail network simulation.
//!
//! Trains move between stations over single-occupant blocks. Every step the
//! engine updates each train's kinematics and lifecycle, arbitrates
//! conflicting block requests with a selectable [`ArbitrationPolicy`], and
//! logs a snapshot per train. A run ends with aggregate delay, throughput and
//! conflict metrics.
//!
//! ```text
//! network ──┐
//!           ├── SimulationEngine::start_run ── RunContext::step (xN) ── RunReport
//! trains ───┘
//! ```
//!
//! [`RailSimPlugin`] runs the same steps inside a Bevy `FixedUpdate`
//! schedule.

pub mod arbitration;
pub mod clock;
pub mod config;
pub mod conflicts;
pub mod engine;
pub mod error;
pub mod events;
pub mod invariants;
pub mod kinematics;
pub mod metrics;
pub mod network;
pub mod plugin;
pub mod simulation_sets;
pub mod state_hash;
pub mod train;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use arbitration::ArbitrationPolicy;
pub use config::RunConfig;
pub use engine::{RunContext, RunReport, SimulationEngine};
pub use error::SimError;
pub use metrics::{SimulationLog, SimulationMetrics};
pub use plugin::{RailSimPlugin, RailSimRun};
pub use simulation_sets::RailSimSet;
