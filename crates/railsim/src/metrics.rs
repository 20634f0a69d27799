//! Per-step train snapshots and end-of-run aggregate metrics.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BlockId, Coordinate, StationId, TrainId};
use crate::train::{Train, TrainStatus};

// =============================================================================
// Simulation log
// =============================================================================

/// One train's state at one logical timestamp. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SimulationLog {
    pub timestamp: f64,
    pub train_id: TrainId,
    pub current_block: Option<BlockId>,
    pub current_station: Option<StationId>,
    pub status: TrainStatus,
    pub delay: f64,
    pub speed: f64,
    pub position: Coordinate,
}

impl SimulationLog {
    pub fn capture(train: &Train, timestamp: f64) -> Self {
        Self {
            timestamp,
            train_id: train.id.clone(),
            current_block: train.current_block.clone(),
            current_station: train.current_station.clone(),
            status: train.status,
            delay: train.delay,
            speed: train.speed,
            position: train.position,
        }
    }
}

// =============================================================================
// Metrics
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SimulationMetrics {
    /// Sum of final delays across trains, in seconds.
    pub total_delay: f64,
    pub max_delay: f64,
    /// Zero when there are no trains.
    pub average_delay: f64,
    /// Trains whose final status is `Arrived`.
    pub throughput: u32,
    /// Denials recorded by the conflict pass (one per loser per step).
    pub conflict_count: u64,
    /// Final logical clock value.
    pub simulation_time: f64,
}

impl SimulationMetrics {
    /// Aggregate from final train state.
    pub fn from_trains(trains: &[Train], conflict_count: u64, simulation_time: f64) -> Self {
        let total_delay: f64 = trains.iter().map(|t| t.delay).sum();
        let max_delay = trains.iter().map(|t| t.delay).fold(0.0, f64::max);
        let average_delay = if trains.is_empty() {
            0.0
        } else {
            total_delay / trains.len() as f64
        };
        let throughput = trains
            .iter()
            .filter(|t| t.status == TrainStatus::Arrived)
            .count() as u32;

        Self {
            total_delay,
            max_delay,
            average_delay,
            throughput,
            conflict_count,
            simulation_time,
        }
    }
}

// =============================================================================
// Final train summary
// =============================================================================

/// One row of the end-of-run train table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TrainSummary {
    pub train_id: TrainId,
    pub name: String,
    pub status: TrainStatus,
    pub delay: f64,
    pub current_station: Option<StationId>,
    pub actual_arrival: Option<f64>,
    /// Actual minus scheduled arrival, when the train arrived.
    pub arrival_deviation: Option<f64>,
}

impl TrainSummary {
    pub fn from_train(train: &Train) -> Self {
        Self {
            train_id: train.id.clone(),
            name: train.name.clone(),
            status: train.status,
            delay: train.delay,
            current_station: train.current_station.clone(),
            actual_arrival: train.actual_arrival,
            arrival_deviation: train.arrival_deviation(),
        }
    }
}
