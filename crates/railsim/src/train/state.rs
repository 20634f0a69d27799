//! `Train` construction, run-state initialisation and lifecycle helpers.

use bevy::prelude::*;

use crate::config::{
    DEFAULT_ACCELERATION_MS2, DEFAULT_MAX_SPEED_KMH, DEFAULT_PRIORITY, DEFAULT_TRAIN_CAPACITY,
    DEFAULT_TRAIN_LENGTH_M,
};
use crate::network::{BlockId, Coordinate, RailwayNetwork, StationId, TrainId};

use super::types::*;

impl Train {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a train with default attributes. Run state is filled in when
    /// the train is registered with an engine.
    pub fn new(
        id: impl Into<TrainId>,
        name: impl Into<String>,
        route: Vec<StationId>,
        block_sequence: Vec<BlockId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: TrainCategory::default(),
            route,
            block_sequence,
            scheduled_departure: 0.0,
            scheduled_arrival: 0.0,
            priority: DEFAULT_PRIORITY,
            max_speed: DEFAULT_MAX_SPEED_KMH,
            acceleration: DEFAULT_ACCELERATION_MS2,
            length: DEFAULT_TRAIN_LENGTH_M,
            capacity: DEFAULT_TRAIN_CAPACITY,
            status: TrainStatus::Stopped,
            speed: 0.0,
            current_station: None,
            next_station: None,
            current_block: None,
            next_block: None,
            position: Coordinate::default(),
            delay: 0.0,
            time_in_status: 0.0,
            dwell_remaining: None,
            platform: None,
            held_block: None,
            actual_arrival: None,
            route_index: 0,
            block_index: 0,
            segment_progress: 0.0,
        }
    }

    pub fn with_category(mut self, category: TrainCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_schedule(mut self, departure: f64, arrival: f64) -> Self {
        self.scheduled_departure = departure;
        self.scheduled_arrival = arrival;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    // -------------------------------------------------------------------------
    // Run state
    // -------------------------------------------------------------------------

    /// Put the train back at its origin: first route station and first
    /// block, `Stopped`, zero speed and delay.
    pub fn reset(&mut self, network: &RailwayNetwork) {
        self.status = TrainStatus::Stopped;
        self.speed = 0.0;
        self.delay = 0.0;
        self.time_in_status = 0.0;
        self.dwell_remaining = None;
        self.platform = None;
        self.held_block = None;
        self.actual_arrival = None;
        self.segment_progress = 0.0;

        self.route_index = 0;
        self.current_station = self.route.first().cloned();
        self.next_station = self.route.get(1).cloned();

        self.block_index = 0;
        self.current_block = self.block_sequence.first().cloned();
        self.next_block = self.block_sequence.get(1).cloned();

        match self
            .current_station
            .as_deref()
            .and_then(|id| network.station(id))
        {
            Some(station) => self.position = station.position,
            None => {
                if let Some(id) = &self.current_station {
                    warn!(
                        "Train {}: origin station '{}' not in network, position left unset",
                        self.id, id
                    );
                }
                self.position = Coordinate::default();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Change status, restarting the in-status timer when the status actually
    /// changes. `Arrived` is never left.
    pub fn set_status(&mut self, status: TrainStatus) {
        if self.status.is_terminal() || self.status == status {
            return;
        }
        self.status = status;
        self.time_in_status = 0.0;
    }

    /// Add `seconds` to the accumulated delay. Negative amounts are ignored.
    pub fn record_delay(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.delay += seconds;
        }
    }

    /// Block this train asks the conflict pass for, if any. Only moving and
    /// waiting trains request blocks.
    pub fn requested_block(&self) -> Option<&str> {
        match self.status {
            TrainStatus::Moving | TrainStatus::Waiting => self.next_block.as_deref(),
            TrainStatus::Stopped | TrainStatus::Arrived => None,
        }
    }

    /// Step to the next route station. Returns `false` when already at the
    /// terminus.
    pub(crate) fn advance_route(&mut self) -> bool {
        if self.route_index + 1 >= self.route.len() {
            return false;
        }
        self.route_index += 1;
        self.current_station = self.route.get(self.route_index).cloned();
        self.next_station = self.route.get(self.route_index + 1).cloned();
        self.segment_progress = 0.0;
        true
    }

    /// Step the block cursor onto the next block of the sequence.
    pub(crate) fn advance_block(&mut self) {
        if self.block_index + 1 >= self.block_sequence.len() {
            return;
        }
        self.block_index += 1;
        self.current_block = self.block_sequence.get(self.block_index).cloned();
        self.next_block = self.block_sequence.get(self.block_index + 1).cloned();
    }

    /// Seconds between scheduled and actual arrival. Positive when late.
    pub fn arrival_deviation(&self) -> Option<f64> {
        self.actual_arrival.map(|t| t - self.scheduled_arrival)
    }
}
