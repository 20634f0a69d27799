//! Data types for trains and their lifecycle status.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BlockId, Coordinate, PlatformId, StationId, TrainId};

// =============================================================================
// Lifecycle
// =============================================================================

/// Lifecycle status. `Arrived` is terminal.
///
/// ```text
/// Stopped --depart--> Moving --denied block--> Waiting
///    ^                  |  ^                      |
///    +----arrival-------+  +----wins block--------+
///    ^                  |                         |
///    |                  +--arrival at terminus--> Arrived
///    |                                            ^
///    +-----------------arrival--------------------+ (from Waiting)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum TrainStatus {
    #[default]
    Stopped,
    Moving,
    Waiting,
    Arrived,
}

impl TrainStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TrainStatus::Stopped => "stopped",
            TrainStatus::Moving => "moving",
            TrainStatus::Waiting => "waiting",
            TrainStatus::Arrived => "arrived",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrainStatus::Arrived)
    }
}

/// Service category. A label only; the engine never branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum TrainCategory {
    #[default]
    Express,
    Local,
    Freight,
}

// =============================================================================
// Train
// =============================================================================

/// A train with its resolved route and mutable run state.
///
/// Times are logical seconds from the start of a run; speeds are km/h.
/// Invariant: `next_station` is the route element right after
/// `current_station`, or `None` at the terminus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    pub category: TrainCategory,
    /// Ordered station identifiers, origin first.
    pub route: Vec<StationId>,
    /// Ordered block identifiers the train will request.
    pub block_sequence: Vec<BlockId>,
    pub scheduled_departure: f64,
    pub scheduled_arrival: f64,
    /// Higher wins block conflicts under the priority policy.
    pub priority: i32,
    /// Top speed in km/h.
    pub max_speed: f64,
    /// Acceleration in m/s².
    pub acceleration: f64,
    /// Length in metres.
    pub length: f64,
    pub capacity: u32,

    // -------------------------------------------------------------------------
    // Run state
    // -------------------------------------------------------------------------
    pub status: TrainStatus,
    /// Current speed in km/h.
    pub speed: f64,
    pub current_station: Option<StationId>,
    pub next_station: Option<StationId>,
    pub current_block: Option<BlockId>,
    pub next_block: Option<BlockId>,
    pub position: Coordinate,
    /// Accumulated delay in seconds. Never decreases during a run.
    pub delay: f64,
    /// Seconds since the last status change.
    pub time_in_status: f64,
    /// Remaining dwell at the current platform. `None` when the train holds
    /// no platform.
    pub dwell_remaining: Option<f64>,
    pub platform: Option<PlatformId>,
    /// Block granted to this train and not yet released.
    pub held_block: Option<BlockId>,
    /// Logical time the train reached its terminus.
    pub actual_arrival: Option<f64>,
    pub(crate) route_index: usize,
    pub(crate) block_index: usize,
    /// Metres covered along the current station-to-station segment.
    pub(crate) segment_progress: f64,
}
