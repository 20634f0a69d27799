//! Per-train, per-step kinematics and lifecycle transitions.
//!
//! For every train that has not arrived, in order:
//! 1. accumulate time in the current status
//! 2. stopped trains burn dwell time and depart when allowed
//! 3. moving trains accelerate, capped by top speed and the current block's limit
//! 4. moving trains advance along the station segment
//! 5. the arrival estimate runs and, if it passes, the train arrives
//!
//! Arrival is an estimate: the train arrives once its time in the current
//! status covers the segment length at its *current* speed. Under
//! acceleration this fires later than the position interpolation would
//! suggest, and it restarts whenever the train changes status. A train held
//! at a block boundary keeps its speed, so a long enough wait also counts as
//! reaching the next station.

use bevy::prelude::*;

use crate::config::KMH_PER_MS;
use crate::events::{EventDetail, EventJournal, EventKind, SimulationEvent};
use crate::network::{Coordinate, RailwayNetwork};
use crate::train::{Train, TrainStatus};

/// What a single update did to the train. Returned for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Idle,
    Departed,
    Advanced,
    ArrivedAtStation,
    ReachedTerminus,
}

/// Advance one train by one step of `dt` seconds at logical time `now`.
pub fn update_train(
    train: &mut Train,
    network: &mut RailwayNetwork,
    now: f64,
    dt: f64,
    journal: &mut EventJournal,
) -> StepOutcome {
    if !train.is_active() {
        return StepOutcome::Idle;
    }

    train.time_in_status += dt;

    let mut outcome = StepOutcome::Idle;
    if train.status == TrainStatus::Stopped {
        consume_dwell(train, dt);
        if should_depart(train, now) {
            depart(train, network, now, journal);
            outcome = StepOutcome::Departed;
        }
    }

    if train.status == TrainStatus::Moving {
        update_speed(train, network, dt);
        advance_position(train, network, dt);
        if outcome == StepOutcome::Idle {
            outcome = StepOutcome::Advanced;
        }
    }

    if should_arrive(train, network) {
        outcome = arrive(train, network, now, journal);
    }
    outcome
}

// =============================================================================
// Departure
// =============================================================================

fn consume_dwell(train: &mut Train, dt: f64) {
    if let Some(remaining) = train.dwell_remaining {
        train.dwell_remaining = Some((remaining - dt).max(0.0));
    }
}

/// A stopped train leaves once its scheduled departure has passed or its
/// dwell has run out. No dwell timer (origin, or no free platform) counts as
/// run out. A train with nowhere to go never departs.
pub fn should_depart(train: &Train, now: f64) -> bool {
    if train.current_station.is_none() || train.next_station.is_none() {
        return false;
    }
    now >= train.scheduled_departure || train.dwell_remaining.is_none_or(|d| d <= 0.0)
}

fn depart(train: &mut Train, network: &mut RailwayNetwork, now: f64, journal: &mut EventJournal) {
    let station_id = train.current_station.clone().unwrap_or_default();
    if train.platform.take().is_some() {
        if let Some(station) = network.station_mut(&station_id) {
            station.release_platform(&train.id);
        }
    }
    train.dwell_remaining = None;
    train.set_status(TrainStatus::Moving);
    debug!("t={}: train {} departs {}", now, train.id, station_id);
    journal.push(SimulationEvent::new(
        now,
        EventKind::Departure,
        train.id.as_str(),
        station_id,
    ));
}

// =============================================================================
// Motion
// =============================================================================

/// Accelerate toward `max_speed`, then clamp to the current block's limit.
pub fn update_speed(train: &mut Train, network: &RailwayNetwork, dt: f64) {
    train.speed = train
        .max_speed
        .min(train.speed + train.acceleration * dt * KMH_PER_MS);

    if let Some(block) = train.current_block.as_deref().and_then(|id| network.block(id)) {
        if train.speed > block.max_speed {
            train.speed = block.max_speed;
        }
    }
}

/// Move along the straight line between current and next station. Skipped
/// when either station is unknown.
fn advance_position(train: &mut Train, network: &RailwayNetwork, dt: f64) {
    let Some((from, to)) = segment(train, network) else {
        return;
    };
    let total = from.distance_to(&to);
    if total <= 0.0 {
        return;
    }
    let speed_ms = train.speed / KMH_PER_MS;
    train.segment_progress = (train.segment_progress + speed_ms * dt).min(total);
    train.position = from.lerp(&to, train.segment_progress / total);
}

fn segment(train: &Train, network: &RailwayNetwork) -> Option<(Coordinate, Coordinate)> {
    let from = network.station(train.current_station.as_deref()?)?;
    let to = network.station(train.next_station.as_deref()?)?;
    Some((from.position, to.position))
}

// =============================================================================
// Arrival
// =============================================================================

/// Estimate-based arrival test: time in the current status covers the
/// segment at the current speed. Stopped trains have no speed and never pass.
pub fn should_arrive(train: &Train, network: &RailwayNetwork) -> bool {
    if !train.is_active() || train.speed <= 0.0 {
        return false;
    }
    let Some((from, to)) = segment(train, network) else {
        return false;
    };
    let travel_time = from.distance_to(&to) / (train.speed / KMH_PER_MS);
    train.time_in_status >= travel_time
}

fn arrive(
    train: &mut Train,
    network: &mut RailwayNetwork,
    now: f64,
    journal: &mut EventJournal,
) -> StepOutcome {
    if !train.advance_route() {
        return StepOutcome::Advanced;
    }
    let station_id = train.current_station.clone().unwrap_or_default();

    let assignment = network
        .station_mut(&station_id)
        .and_then(|station| station.assign_platform(&train.id));
    if let Some(station) = network.station(&station_id) {
        train.position = station.position;
    }
    match &assignment {
        Some(a) => {
            train.platform = Some(a.platform_id.clone());
            train.dwell_remaining = Some(a.dwell_time);
        }
        None => {
            debug!("t={}: no free platform for train {} at {}", now, train.id, station_id);
            train.platform = None;
            train.dwell_remaining = None;
        }
    }
    train.speed = 0.0;

    journal.push(
        SimulationEvent::new(now, EventKind::Arrival, train.id.as_str(), station_id.as_str())
            .with_detail(EventDetail::Platform {
                platform_id: assignment.map(|a| a.platform_id),
            }),
    );

    if train.next_station.is_some() {
        train.set_status(TrainStatus::Stopped);
        return StepOutcome::ArrivedAtStation;
    }

    train.set_status(TrainStatus::Arrived);
    train.actual_arrival = Some(now);
    if let Some(block_id) = train.held_block.take() {
        if let Some(block) = network.block_mut(&block_id) {
            block.release(&train.id);
        }
    }
    info!("t={}: train {} reached terminus {}", now, train.id, station_id);
    StepOutcome::ReachedTerminus
}
