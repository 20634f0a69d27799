//! # TestRail: headless test harness for the rail engine
//!
//! Wraps a `bevy::app::App` with `RailSimPlugin` and a `SimulationEngine`
//! so tests can drive a run tick by tick, or run it synchronously, against
//! the same trains.

mod assertions;
mod corridor;
mod networks;

use bevy::app::App;
use bevy::prelude::*;

pub use corridor::{random_corridor, Corridor};
pub use networks::*;

use crate::config::RunConfig;
use crate::engine::{RunContext, RunReport, SimulationEngine};
use crate::network::RailwayNetwork;
use crate::plugin::{RailSimPlugin, RailSimRun};
use crate::train::Train;

/// A headless Bevy App plus the engine whose runs it ticks.
pub struct TestRail {
    app: App,
    engine: SimulationEngine,
}

impl TestRail {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    pub fn new(network: RailwayNetwork) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(RailSimPlugin);
        Self {
            app,
            engine: SimulationEngine::new(network),
        }
    }

    pub fn with_train(mut self, train: Train) -> Self {
        if let Err(e) = self.engine.add_train(train) {
            panic!("TestRail: failed to add train: {e}");
        }
        self
    }

    pub fn with_trains(self, trains: impl IntoIterator<Item = Train>) -> Self {
        trains.into_iter().fold(self, TestRail::with_train)
    }

    /// Start a plugin-driven run with `config`.
    pub fn start(mut self, config: RunConfig) -> Self {
        match RailSimRun::start(&self.engine, &config) {
            Ok(run) => {
                self.app.insert_resource(run);
            }
            Err(e) => panic!("TestRail: failed to start run: {e}"),
        }
        self
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Run N engine steps by executing the `FixedUpdate` schedule directly,
    /// bypassing Bevy's virtual time.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Tick until the plugin has produced a report, at most `max_ticks`
    /// times.
    pub fn tick_until_finished(&mut self, max_ticks: u32) -> RunReport {
        for _ in 0..max_ticks {
            if self.run_resource().report().is_some() {
                break;
            }
            self.tick(1);
        }
        match self.run_resource().report() {
            Some(report) => report.clone(),
            None => panic!("TestRail: run not finished after {max_ticks} ticks"),
        }
    }

    /// Run synchronously through the engine, without the app.
    pub fn run_direct(&self, config: &RunConfig) -> RunReport {
        match self.engine.run(config) {
            Ok(report) => report,
            Err(e) => panic!("TestRail: run failed: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn run_resource(&self) -> &RailSimRun {
        self.app.world().resource::<RailSimRun>()
    }

    pub fn run_resource_mut(&mut self) -> Mut<'_, RailSimRun> {
        self.app.world_mut().resource_mut::<RailSimRun>()
    }

    /// The in-flight run context.
    pub fn context(&self) -> &RunContext {
        match self.run_resource().context() {
            Some(context) => context,
            None => panic!("TestRail: no run in progress"),
        }
    }

    pub fn train(&self, id: &str) -> &Train {
        match self.context().train(id) {
            Some(train) => train,
            None => panic!("TestRail: no train '{id}' in the current run"),
        }
    }
}
