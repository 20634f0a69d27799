//! Ordered `SystemSet` phases for one engine step inside `FixedUpdate`.
//!
//! ```text
//! PreStep  →  Step  →  PostStep
//! ```
//!
//! * **PreStep** – drain scheduled events that have come due.
//! * **Step** – train kinematics, then block arbitration.
//! * **PostStep** – log snapshot, clock advance and, once the clock reaches
//!   `max_time`, turning the run into a report. Systems here only read the
//!   trains.

use bevy::prelude::*;

/// Configured as a chain: `PreStep` → `Step` → `PostStep`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RailSimSet {
    PreStep,
    Step,
    PostStep,
}
