//! Deterministic hashing of run output for reproducibility checks.
//!
//! The hash covers, in order:
//!
//! 1. Every log row in capture order (timestamp, train, block, station,
//!    status, delay, speed, position)
//! 2. The aggregate metrics
//!
//! Float values are hashed through their bit representation.

use std::hash::{Hash, Hasher};

use crate::metrics::{SimulationLog, SimulationMetrics};

// ---------------------------------------------------------------------------
// FNV-1a hasher (deterministic, no random seed)
// ---------------------------------------------------------------------------

/// FNV-1a: stable across platforms and Rust versions, unlike `DefaultHasher`.
pub(crate) struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    pub(crate) fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

// ---------------------------------------------------------------------------
// Public convenience function
// ---------------------------------------------------------------------------

/// Hash a run's log and metrics. Identical runs hash identically.
pub fn compute_run_hash(logs: &[SimulationLog], metrics: &SimulationMetrics) -> u64 {
    let mut hasher = Fnv1aHasher::new();

    for log in logs {
        log.timestamp.to_bits().hash(&mut hasher);
        log.train_id.hash(&mut hasher);
        log.current_block.hash(&mut hasher);
        log.current_station.hash(&mut hasher);
        log.status.hash(&mut hasher);
        log.delay.to_bits().hash(&mut hasher);
        log.speed.to_bits().hash(&mut hasher);
        log.position.x.to_bits().hash(&mut hasher);
        log.position.y.to_bits().hash(&mut hasher);
    }

    metrics.total_delay.to_bits().hash(&mut hasher);
    metrics.max_delay.to_bits().hash(&mut hasher);
    metrics.average_delay.to_bits().hash(&mut hasher);
    metrics.throughput.hash(&mut hasher);
    metrics.conflict_count.hash(&mut hasher);
    metrics.simulation_time.to_bits().hash(&mut hasher);

    hasher.finish()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
