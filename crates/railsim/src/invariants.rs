//! Runtime invariant validation for network occupancy.
//!
//! Checked after every step; violations are logged with `warn!` and counted
//! so tests can assert a clean run.
//!
//! Validated invariants:
//! 1. **Block flag**: a block is `Occupied` iff it has an occupant.
//! 2. **Exclusive hold**: no block is held by more than one train.
//! 3. **Hold consistency**: a train's held block names that train as occupant.
//! 4. **Platform flag**: a platform is `occupied` iff it has an occupant.

use std::collections::HashMap;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BlockStatus, RailwayNetwork};
use crate::train::Train;

// ---------------------------------------------------------------------------
// Violation counter
// ---------------------------------------------------------------------------

/// Violation totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InvariantViolations {
    /// Blocks whose status disagrees with their occupant.
    pub block_flag_mismatch: u32,
    /// Blocks claimed as held by more than one train.
    pub block_shared: u32,
    /// Trains holding a block that names someone else (or nobody).
    pub hold_mismatch: u32,
    /// Platforms whose flag disagrees with their occupant.
    pub platform_flag_mismatch: u32,
}

impl InvariantViolations {
    pub fn total(&self) -> u32 {
        self.block_flag_mismatch + self.block_shared + self.hold_mismatch + self.platform_flag_mismatch
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    pub fn absorb(&mut self, other: InvariantViolations) {
        self.block_flag_mismatch += other.block_flag_mismatch;
        self.block_shared += other.block_shared;
        self.hold_mismatch += other.hold_mismatch;
        self.platform_flag_mismatch += other.platform_flag_mismatch;
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Check every invariant against the current state at logical time `now`.
pub fn check_invariants(network: &RailwayNetwork, trains: &[Train], now: f64) -> InvariantViolations {
    let mut violations = InvariantViolations::default();

    for block in network.blocks() {
        let flagged = block.status == BlockStatus::Occupied;
        if flagged != block.occupant.is_some() {
            warn!(
                "Invariant violation at t={}: block {} is {} with occupant {:?}",
                now,
                block.id,
                block.status.name(),
                block.occupant
            );
            violations.block_flag_mismatch += 1;
        }
    }

    let mut holders: HashMap<&str, u32> = HashMap::new();
    for train in trains {
        let Some(held) = train.held_block.as_deref() else {
            continue;
        };
        *holders.entry(held).or_insert(0) += 1;
        let occupant = network.block(held).and_then(|b| b.occupant.as_deref());
        if occupant != Some(train.id.as_str()) {
            warn!(
                "Invariant violation at t={}: train {} holds block {} but its occupant is {:?}",
                now, train.id, held, occupant
            );
            violations.hold_mismatch += 1;
        }
    }
    for (block_id, count) in holders {
        if count > 1 {
            warn!(
                "Invariant violation at t={}: block {} held by {} trains",
                now, block_id, count
            );
            violations.block_shared += 1;
        }
    }

    for station in network.stations() {
        for platform in &station.platforms {
            if platform.occupied != platform.occupant.is_some() {
                warn!(
                    "Invariant violation at t={}: platform {} at {} occupied={} occupant={:?}",
                    now, platform.id, station.id, platform.occupied, platform.occupant
                );
                violations.platform_flag_mismatch += 1;
            }
        }
    }

    violations
}
