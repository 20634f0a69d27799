//! Bevy integration: one engine step per `FixedUpdate` tick.
//!
//! The plugin drives the same [`RunContext`] phase methods the synchronous
//! [`SimulationEngine::run`] uses, so a run driven by ticks produces exactly
//! the same report.

use bevy::prelude::*;

use crate::config::RunConfig;
use crate::engine::{RunContext, RunReport, SimulationEngine};
use crate::error::SimError;
use crate::simulation_sets::RailSimSet;

// =============================================================================
// Resource
// =============================================================================

/// The run currently being ticked, and the report of the last finished run.
#[derive(Resource, Default)]
pub struct RailSimRun {
    context: Option<RunContext>,
    report: Option<RunReport>,
}

impl RailSimRun {
    /// A resource with a run already started.
    pub fn start(engine: &SimulationEngine, config: &RunConfig) -> Result<Self, SimError> {
        Ok(Self {
            context: Some(engine.start_run(config)?),
            report: None,
        })
    }

    /// Replace whatever is running with a fresh run. The previous report is
    /// dropped.
    pub fn restart(&mut self, engine: &SimulationEngine, config: &RunConfig) -> Result<(), SimError> {
        let context = engine.start_run(config)?;
        self.context = Some(context);
        self.report = None;
        Ok(())
    }

    /// Stop ticking and produce a report from the last completed step.
    pub fn cancel(&mut self) {
        if let Some(context) = self.context.take() {
            info!("Run cancelled at t={}", context.clock().time);
            self.report = Some(context.finish());
        }
    }

    pub fn context(&self) -> Option<&RunContext> {
        self.context.as_ref()
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn take_report(&mut self) -> Option<RunReport> {
        self.report.take()
    }

    pub fn is_running(&self) -> bool {
        self.context.as_ref().is_some_and(|c| !c.is_finished())
    }

    fn active(&mut self) -> Option<&mut RunContext> {
        self.context.as_mut().filter(|c| !c.is_finished())
    }
}

// =============================================================================
// Systems
// =============================================================================

fn run_active(run: Res<RailSimRun>) -> bool {
    run.is_running()
}

fn drain_due_events(mut run: ResMut<RailSimRun>) {
    if let Some(context) = run.active() {
        context.drain_due_events();
    }
}

fn update_trains(mut run: ResMut<RailSimRun>) {
    if let Some(context) = run.active() {
        context.update_trains();
    }
}

fn resolve_conflicts(mut run: ResMut<RailSimRun>) {
    if let Some(context) = run.active() {
        context.resolve_conflicts();
    }
}

fn record_snapshot(mut run: ResMut<RailSimRun>) {
    if let Some(context) = run.active() {
        context.record_snapshot();
    }
}

fn advance_clock(mut run: ResMut<RailSimRun>) {
    if let Some(context) = run.active() {
        context.advance_clock();
    }
}

/// Turn a run whose clock reached `max_time` into a report.
fn finalize_run(mut run: ResMut<RailSimRun>) {
    let finished = run.context.as_ref().is_some_and(RunContext::is_finished);
    if !finished {
        return;
    }
    if let Some(context) = run.context.take() {
        run.report = Some(context.finish());
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct RailSimPlugin;

impl Plugin for RailSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RailSimRun>()
            .configure_sets(
                FixedUpdate,
                (RailSimSet::PreStep, RailSimSet::Step, RailSimSet::PostStep).chain(),
            )
            .add_systems(
                FixedUpdate,
                drain_due_events
                    .run_if(run_active)
                    .in_set(RailSimSet::PreStep),
            )
            .add_systems(
                FixedUpdate,
                (update_trains, resolve_conflicts)
                    .chain()
                    .run_if(run_active)
                    .in_set(RailSimSet::Step),
            )
            .add_systems(
                FixedUpdate,
                (record_snapshot, advance_clock, finalize_run)
                    .chain()
                    .in_set(RailSimSet::PostStep),
            );
    }
}
