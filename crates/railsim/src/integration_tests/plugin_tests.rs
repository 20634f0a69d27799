use crate::arbitration::ArbitrationPolicy;
use crate::config::RunConfig;
use crate::test_harness::{line_train, two_station_line, TestRail};
use crate::train::TrainStatus;

// ====================================================================
// RailSimPlugin driven by FixedUpdate ticks
// ====================================================================

fn contended_line() -> TestRail {
    TestRail::new(two_station_line(1000.0))
        .with_train(line_train("LOW", 1, 0.0))
        .with_train(line_train("HIGH", 5, 0.0))
}

#[test]
fn test_plugin_resource_starts_idle() {
    let rail = TestRail::new(two_station_line(1000.0));
    assert!(!rail.run_resource().is_running());
    assert!(rail.run_resource().report().is_none());
}

#[test]
fn test_plugin_advances_one_step_per_tick() {
    let mut rail = contended_line().start(RunConfig::new(100.0));
    rail.tick(5);
    assert_eq!(rail.context().clock().steps, 5);
    assert_eq!(rail.context().clock().time, 5.0);
    assert_eq!(rail.context().logs().len(), 10);
}

#[test]
fn test_plugin_arbitrates_like_engine() {
    let mut rail = contended_line().start(RunConfig::new(100.0));
    rail.tick(1);
    rail.assert_train_status("HIGH", TrainStatus::Moving);
    rail.assert_train_status("LOW", TrainStatus::Waiting);
    rail.assert_block_held_by("B2", "HIGH");
    rail.assert_no_violations();
}

#[test]
fn test_plugin_run_matches_direct_run() {
    for policy in ArbitrationPolicy::ALL {
        let config = RunConfig::new(150.0).with_policy(policy);
        let mut rail = contended_line().start(config.clone());
        let ticked = rail.tick_until_finished(500);
        let direct = rail.run_direct(&config);
        assert_eq!(ticked, direct, "policy {}", policy.name());
    }
}

#[test]
fn test_plugin_stops_after_max_time() {
    let mut rail = contended_line().start(RunConfig::new(20.0));
    let report = rail.tick_until_finished(100);
    assert_eq!(report.metrics.simulation_time, 20.0);
    assert!(!rail.run_resource().is_running());

    // Further ticks leave the finished report alone.
    rail.tick(10);
    assert_eq!(rail.run_resource().report(), Some(&report));
}

#[test]
fn test_plugin_zero_max_time_reports_on_first_tick() {
    let mut rail = contended_line().start(RunConfig::new(0.0));
    rail.tick(1);
    let report = rail.run_resource().report().cloned().unwrap();
    assert!(report.logs.is_empty());
    assert_eq!(report.metrics.throughput, 0);
}

#[test]
fn test_plugin_cancel_keeps_completed_steps() {
    let mut rail = contended_line().start(RunConfig::new(500.0));
    rail.tick(7);
    rail.run_resource_mut().cancel();
    let report = rail.run_resource().report().cloned().unwrap();
    assert_eq!(report.metrics.simulation_time, 7.0);
    assert_eq!(report.logs.len(), 14);
    assert_eq!(report.metrics.conflict_count, 7);
}

#[test]
fn test_plugin_restart_resets_state() {
    let mut rail = contended_line().start(RunConfig::new(50.0));
    rail.tick(20);
    let engine = rail.engine().clone();
    rail.run_resource_mut()
        .restart(&engine, &RunConfig::new(50.0))
        .unwrap();
    assert_eq!(rail.context().clock().steps, 0);
    rail.assert_train_status("LOW", TrainStatus::Stopped);
    assert_eq!(rail.train("LOW").delay, 0.0);
}
