use bevy::prelude::*;

use crate::arbitration::ArbitrationPolicy;
use crate::config::RunConfig;
use crate::error::SimError;
use crate::metrics::SimulationMetrics;
use crate::network::RailwayNetwork;
use crate::train::Train;

use super::{RunContext, RunReport};

/// Owns the network and the registered trains between runs.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    network: RailwayNetwork,
    trains: Vec<Train>,
}

impl SimulationEngine {
    pub fn new(network: RailwayNetwork) -> Self {
        Self {
            network,
            trains: Vec::new(),
        }
    }

    /// Register a train and place it at its origin station.
    ///
    /// Unknown stations or blocks in the route are logged, not rejected: the
    /// affected updates are skipped during the run.
    pub fn add_train(&mut self, mut train: Train) -> Result<(), SimError> {
        if self.trains.iter().any(|t| t.id == train.id) {
            return Err(SimError::DuplicateTrain(train.id));
        }
        for station_id in &train.route {
            if self.network.station(station_id).is_none() {
                warn!("Train {}: route station '{}' not in network", train.id, station_id);
            }
        }
        for block_id in &train.block_sequence {
            if self.network.block(block_id).is_none() {
                warn!("Train {}: block '{}' not in network", train.id, block_id);
            }
        }
        train.reset(&self.network);
        self.trains.push(train);
        Ok(())
    }

    pub fn network(&self) -> &RailwayNetwork {
        &self.network
    }

    /// Registered trains, in registration order.
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn train(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Validate `config` and build a fresh run context. Nothing is created
    /// when validation fails.
    pub fn start_run(&self, config: &RunConfig) -> Result<RunContext, SimError> {
        config.validate()?;
        if self.network.is_empty() {
            return Err(SimError::EmptyNetwork);
        }
        Ok(RunContext::new(
            self.network.clone(),
            self.trains.clone(),
            config,
        ))
    }

    /// Run to completion.
    pub fn run(&self, config: &RunConfig) -> Result<RunReport, SimError> {
        let mut context = self.start_run(config)?;
        while context.step() {}
        Ok(context.finish())
    }

    /// Run the same trains under every policy and return each policy's
    /// metrics, in [`ArbitrationPolicy::ALL`] order.
    pub fn compare_policies(
        &self,
        max_time: f64,
        time_step: f64,
    ) -> Result<Vec<(ArbitrationPolicy, SimulationMetrics)>, SimError> {
        ArbitrationPolicy::ALL
            .into_iter()
            .map(|policy| {
                let config = RunConfig::new(max_time)
                    .with_time_step(time_step)
                    .with_policy(policy);
                let report = self.run(&config)?;
                info!(
                    "Policy {}: total delay {}, throughput {}, conflicts {}",
                    policy.name(),
                    report.metrics.total_delay,
                    report.metrics.throughput,
                    report.metrics.conflict_count
                );
                Ok((policy, report.metrics))
            })
            .collect()
    }
}
