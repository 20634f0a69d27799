//! Criterion benchmarks for whole runs and single steps.
//!
//! Benchmarks:
//!   - full run of a random corridor at 10, 50 and 200 trains, per policy
//!   - a single `RunContext::step` on a 200-train corridor
//!   - the conflict pass alone on a 200-train corridor
//!
//! Run with: cargo bench -p railsim --bench run_bench --features bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use railsim::arbitration::ArbitrationPolicy;
use railsim::config::RunConfig;
use railsim::engine::SimulationEngine;
use railsim::test_harness::{random_corridor, Corridor};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn corridor_engine(trains: usize) -> SimulationEngine {
    let Corridor { network, trains } = random_corridor(42, 20, trains);
    let mut engine = SimulationEngine::new(network);
    for train in trains {
        if let Err(e) = engine.add_train(train) {
            panic!("bench setup: {e}");
        }
    }
    engine
}

// ---------------------------------------------------------------------------
// Benchmark: full run
// ---------------------------------------------------------------------------

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);

    for &count in &[10usize, 50, 200] {
        let engine = corridor_engine(count);
        for policy in ArbitrationPolicy::ALL {
            let config = RunConfig::new(1800.0).with_policy(policy);
            group.bench_with_input(
                BenchmarkId::new(policy.name(), count),
                &config,
                |b, config| b.iter(|| black_box(engine.run(config))),
            );
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: single step
// ---------------------------------------------------------------------------

fn bench_single_step(c: &mut Criterion) {
    let engine = corridor_engine(200);
    let config = RunConfig::new(1.0e9);

    c.bench_function("step_200_trains", |b| {
        b.iter_batched(
            || {
                let mut context = match engine.start_run(&config) {
                    Ok(context) => context,
                    Err(e) => panic!("bench setup: {e}"),
                };
                // Get trains out of the origin and into contention first.
                for _ in 0..120 {
                    context.step();
                }
                context
            },
            |mut context| black_box(context.step()),
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("conflict_pass_200_trains", |b| {
        b.iter_batched(
            || {
                let mut context = match engine.start_run(&config) {
                    Ok(context) => context,
                    Err(e) => panic!("bench setup: {e}"),
                };
                for _ in 0..120 {
                    context.step();
                }
                context.update_trains();
                context
            },
            |mut context| {
                context.resolve_conflicts();
                black_box(context.conflict_count())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_full_run, bench_single_step);
criterion_main!(benches);
