use bevy::prelude::*;

use crate::arbitration::ArbitrationPolicy;
use crate::clock::SimulationClock;
use crate::config::RunConfig;
use crate::conflicts;
use crate::events::{EventJournal, EventQueue};
use crate::invariants::{check_invariants, InvariantViolations};
use crate::kinematics;
use crate::metrics::{SimulationLog, SimulationMetrics};
use crate::network::RailwayNetwork;
use crate::train::Train;

use super::RunReport;

/// All state of one run: its own network copy, trains, clock, queue, journal,
/// log and counters.
///
/// Stopping calls to [`RunContext::step`] cancels the run; everything up to
/// the last completed step stays valid and [`RunContext::finish`] still
/// produces a report.
#[derive(Debug, Clone)]
pub struct RunContext {
    network: RailwayNetwork,
    trains: Vec<Train>,
    policy: ArbitrationPolicy,
    clock: SimulationClock,
    queue: EventQueue,
    journal: EventJournal,
    logs: Vec<SimulationLog>,
    conflict_count: u64,
    violations: InvariantViolations,
}

impl RunContext {
    /// Reset occupancy and every train, then seed the event queue.
    pub(crate) fn new(mut network: RailwayNetwork, mut trains: Vec<Train>, config: &RunConfig) -> Self {
        network.reset_occupancy();
        for train in &mut trains {
            train.reset(&network);
        }
        let queue = EventQueue::from_schedules(&trains);

        info!(
            "Run started: {} trains, policy {}, max_time {}, step {}",
            trains.len(),
            config.policy.name(),
            config.max_time,
            config.time_step
        );

        Self {
            network,
            trains,
            policy: config.policy,
            clock: SimulationClock::new(config.time_step, config.max_time),
            queue,
            journal: EventJournal::default(),
            logs: Vec::new(),
            conflict_count: 0,
            violations: InvariantViolations::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Step phases
    // -------------------------------------------------------------------------

    /// Move scheduled events whose time has come into the journal.
    pub fn drain_due_events(&mut self) {
        let due = self.queue.drain_due(self.clock.time);
        self.journal.extend(due);
    }

    /// Kinematics and lifecycle update for every train that has not arrived.
    pub fn update_trains(&mut self) {
        let now = self.clock.time;
        let dt = self.clock.step;
        for train in &mut self.trains {
            kinematics::update_train(train, &mut self.network, now, dt, &mut self.journal);
        }
    }

    pub fn resolve_conflicts(&mut self) {
        conflicts::resolve_conflicts(
            &mut self.trains,
            &mut self.network,
            self.policy,
            self.clock.time,
            self.clock.step,
            &mut self.journal,
            &mut self.conflict_count,
        );
    }

    /// Append one log row per train, then check occupancy invariants.
    pub fn record_snapshot(&mut self) {
        let now = self.clock.time;
        self.logs
            .extend(self.trains.iter().map(|t| SimulationLog::capture(t, now)));
        self.violations
            .absorb(check_invariants(&self.network, &self.trains, now));
    }

    pub fn advance_clock(&mut self) {
        self.clock.advance();
    }

    /// Execute one full step. Returns `false` without doing anything once the
    /// clock has reached `max_time`.
    pub fn step(&mut self) -> bool {
        if self.clock.is_finished() {
            return false;
        }
        self.drain_due_events();
        self.update_trains();
        self.resolve_conflicts();
        self.record_snapshot();
        self.advance_clock();
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn policy(&self) -> ArbitrationPolicy {
        self.policy
    }

    pub fn network(&self) -> &RailwayNetwork {
        &self.network
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn train(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    pub fn logs(&self) -> &[SimulationLog] {
        &self.logs
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn conflict_count(&self) -> u64 {
        self.conflict_count
    }

    pub fn violations(&self) -> InvariantViolations {
        self.violations
    }

    /// Metrics from the current state. Valid mid-run.
    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::from_trains(&self.trains, self.conflict_count, self.clock.time)
    }

    /// Compute metrics and hand everything over as a report.
    pub fn finish(self) -> RunReport {
        let metrics = self.metrics();
        info!(
            "Run finished at t={} ({} steps): throughput {}/{}, total delay {}, conflicts {}",
            self.clock.time,
            self.clock.steps,
            metrics.throughput,
            self.trains.len(),
            metrics.total_delay,
            metrics.conflict_count
        );
        if !self.violations.is_clean() {
            warn!(
                "Run finished with {} invariant violation(s): {:?}",
                self.violations.total(),
                self.violations
            );
        }

        RunReport {
            policy: self.policy,
            time_step: self.clock.step,
            network: self.network.snapshot(),
            logs: self.logs,
            metrics,
            trains: self.trains,
            events: self.journal,
            violations: self.violations,
        }
    }
}
