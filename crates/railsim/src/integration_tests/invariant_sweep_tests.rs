use std::collections::HashMap;

use crate::arbitration::ArbitrationPolicy;
use crate::config::RunConfig;
use crate::engine::{RunReport, SimulationEngine};
use crate::test_harness::{random_corridor, Corridor};
use crate::train::TrainStatus;

// ====================================================================
// Randomised corridors: occupancy and lifecycle invariants hold
// ====================================================================

fn run_corridor(seed: u64, policy: ArbitrationPolicy) -> RunReport {
    let Corridor { network, trains } = random_corridor(seed, 6, 8);
    let mut engine = SimulationEngine::new(network);
    for train in trains {
        engine.add_train(train).unwrap();
    }
    engine
        .run(&RunConfig::new(1500.0).with_policy(policy))
        .unwrap()
}

#[test]
fn test_corridor_generation_is_deterministic() {
    let a = random_corridor(7, 5, 4);
    let b = random_corridor(7, 5, 4);
    assert_eq!(a.trains, b.trains);
    assert_eq!(a.network.snapshot(), b.network.snapshot());
}

#[test]
fn test_no_occupancy_violations_across_seeds() {
    for seed in 0..8 {
        for policy in ArbitrationPolicy::ALL {
            let report = run_corridor(seed, policy);
            assert!(
                report.violations.is_clean(),
                "seed {seed} policy {}: {:?}",
                policy.name(),
                report.violations
            );
        }
    }
}

#[test]
fn test_delay_monotonic_and_arrived_terminal() {
    for seed in 0..8 {
        let report = run_corridor(seed, ArbitrationPolicy::Priority);
        let mut last: HashMap<&str, (f64, TrainStatus)> = HashMap::new();
        for row in &report.logs {
            if let Some(&(delay, status)) = last.get(row.train_id.as_str()) {
                assert!(
                    row.delay >= delay,
                    "seed {seed}: delay of {} fell from {delay} to {}",
                    row.train_id,
                    row.delay
                );
                if status == TrainStatus::Arrived {
                    assert_eq!(row.status, TrainStatus::Arrived, "seed {seed}: {} left Arrived", row.train_id);
                }
            }
            last.insert(row.train_id.as_str(), (row.delay, row.status));
        }
    }
}

#[test]
fn test_each_block_has_at_most_one_holder_per_step() {
    for seed in 0..4 {
        let Corridor { network, trains } = random_corridor(seed, 5, 6);
        let mut engine = SimulationEngine::new(network);
        for train in trains {
            engine.add_train(train).unwrap();
        }
        let mut context = engine.start_run(&RunConfig::new(800.0)).unwrap();
        while context.step() {
            let mut holders: HashMap<&str, &str> = HashMap::new();
            for train in context.trains() {
                if let Some(block) = train.held_block.as_deref() {
                    if let Some(other) = holders.insert(block, train.id.as_str()) {
                        panic!(
                            "seed {seed} t={}: block {block} held by {other} and {}",
                            context.clock().time,
                            train.id
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_metrics_match_final_train_state() {
    let report = run_corridor(3, ArbitrationPolicy::FirstCome);
    let total: f64 = report.trains.iter().map(|t| t.delay).sum();
    let arrived = report
        .trains
        .iter()
        .filter(|t| t.status == TrainStatus::Arrived)
        .count() as u32;
    assert_eq!(report.metrics.total_delay, total);
    assert_eq!(report.metrics.throughput, arrived);
    assert_eq!(
        report.metrics.conflict_count,
        report.events.of_kind(crate::events::EventKind::Delay).count() as u64
    );
}
