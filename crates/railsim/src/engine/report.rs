use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::arbitration::ArbitrationPolicy;
use crate::error::SimError;
use crate::events::EventJournal;
use crate::invariants::InvariantViolations;
use crate::metrics::{SimulationLog, SimulationMetrics, TrainSummary};
use crate::network::NetworkSnapshot;
use crate::state_hash::compute_run_hash;
use crate::train::Train;

/// Everything a run produced: the per-step log, aggregate metrics, final
/// train and network state, the event journal and invariant totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RunReport {
    pub policy: ArbitrationPolicy,
    pub time_step: f64,
    /// One row per train per step, grouped by step in capture order.
    pub logs: Vec<SimulationLog>,
    pub metrics: SimulationMetrics,
    pub trains: Vec<Train>,
    pub network: NetworkSnapshot,
    pub events: EventJournal,
    pub violations: InvariantViolations,
}

impl RunReport {
    /// Encode the report to compact binary bytes via bitcode.
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Decode a report from bitcode bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SimError> {
        Ok(bitcode::decode(bytes)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Log rows grouped by step timestamp.
    pub fn steps(&self) -> impl Iterator<Item = &[SimulationLog]> + '_ {
        self.logs.chunk_by(|a, b| a.timestamp == b.timestamp)
    }

    /// Log rows of one train, in step order.
    pub fn train_log<'a>(&'a self, train_id: &'a str) -> impl Iterator<Item = &'a SimulationLog> + 'a {
        self.logs.iter().filter(move |l| l.train_id == train_id)
    }

    pub fn train(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Final status table, in registration order.
    pub fn train_summaries(&self) -> Vec<TrainSummary> {
        self.trains.iter().map(TrainSummary::from_train).collect()
    }

    /// Deterministic hash of logs and metrics.
    pub fn fingerprint(&self) -> u64 {
        compute_run_hash(&self.logs, &self.metrics)
    }
}
