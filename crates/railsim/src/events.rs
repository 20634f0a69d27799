//! Simulation events, the scheduled-event queue and the event journal.
//!
//! The queue is seeded with every train's scheduled departure and arrival at
//! the start of a run and drained as the clock passes each timestamp. It
//! never gates motion: drained entries go straight into the journal, which
//! is the audit trail of a run.

use std::collections::VecDeque;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BlockId, TrainId};
use crate::train::Train;

// =============================================================================
// Event types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ScheduledDeparture,
    ScheduledArrival,
    Departure,
    Arrival,
    BlockEnter,
    Delay,
}

/// Why a train was denied its requested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum DelayReason {
    /// Lost arbitration against another requester.
    LostArbitration,
    /// The block is held by a train outside the requesting group.
    BlockOccupied,
    /// The block is under maintenance.
    BlockMaintenance,
}

/// Optional payload attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum EventDetail {
    BlockConflict {
        block_id: BlockId,
        reason: DelayReason,
    },
    Platform {
        platform_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SimulationEvent {
    pub timestamp: f64,
    pub kind: EventKind,
    pub train_id: TrainId,
    /// Station or block identifier, depending on `kind`.
    pub location: String,
    pub detail: Option<EventDetail>,
}

impl SimulationEvent {
    pub fn new(
        timestamp: f64,
        kind: EventKind,
        train_id: impl Into<TrainId>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            train_id: train_id.into(),
            location: location.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

// =============================================================================
// Event queue
// =============================================================================

/// Scheduled events sorted by timestamp. Equal timestamps keep insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<SimulationEvent>,
}

impl EventQueue {
    /// Seed the queue with each train's scheduled departure (at its origin)
    /// and scheduled arrival (at its terminus), in registration order.
    pub fn from_schedules(trains: &[Train]) -> Self {
        let mut events = Vec::with_capacity(trains.len() * 2);
        for train in trains {
            events.push(SimulationEvent::new(
                train.scheduled_departure,
                EventKind::ScheduledDeparture,
                train.id.as_str(),
                train.route.first().cloned().unwrap_or_default(),
            ));
            events.push(SimulationEvent::new(
                train.scheduled_arrival,
                EventKind::ScheduledArrival,
                train.id.as_str(),
                train.route.last().cloned().unwrap_or_default(),
            ));
        }
        // Stable sort keeps registration order on ties.
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self {
            events: events.into(),
        }
    }

    /// Remove and return every event with `timestamp <= now`.
    pub fn drain_due(&mut self, now: f64) -> Vec<SimulationEvent> {
        let mut due = Vec::new();
        while self.events.front().is_some_and(|e| e.timestamp <= now) {
            if let Some(event) = self.events.pop_front() {
                due.push(event);
            }
        }
        due
    }

    pub fn peek(&self) -> Option<&SimulationEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// =============================================================================
// Event journal
// =============================================================================

/// Append-only record of everything that happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct EventJournal {
    pub events: Vec<SimulationEvent>,
}

impl EventJournal {
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = SimulationEvent>) {
        self.events.extend(events);
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &SimulationEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn for_train<'a>(&'a self, train_id: &'a str) -> impl Iterator<Item = &'a SimulationEvent> + 'a {
        self.events.iter().filter(move |e| e.train_id == train_id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
