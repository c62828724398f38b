//! Registry scenario benchmarks using Criterion.
//!
//! These benchmarks measure realistic workloads:
//! - Random event mix over a shared actor population
//! - Listener churn between fire calls

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rusty_bus_bench::memory::measure_memory;
use rusty_bus_bench::scenarios::{ChurnConfig, ChurnScenario, MixConfig, MixScenario, Scenario};

#[cfg(feature = "memory_profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

// =============================================================================
// Event Mix Benchmarks
// =============================================================================

fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/mix");

    for actors in [16, 64, 256] {
        let config = MixConfig {
            actors,
            ..Default::default()
        };
        group.throughput(Throughput::Elements(config.batch as u64));

        group.bench_with_input(BenchmarkId::new("round", actors), &actors, |b, &n| {
            let mut scenario = MixScenario::with_config(MixConfig {
                actors: n,
                ..Default::default()
            });
            let ((), footprint) = measure_memory(|| scenario.setup());
            if !footprint.is_empty() {
                println!(
                    "{} ({}) setup, {n} listeners: {footprint}, {:.1} bytes/listener",
                    scenario.name(),
                    scenario.description(),
                    footprint.bytes_per(scenario.listener_count())
                );
            }

            b.iter(|| scenario.update());
            scenario.teardown();
        });
    }

    group.finish();
}

// =============================================================================
// Churn Benchmarks
// =============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/churn");

    let configs = [
        (
            "small",
            ChurnConfig {
                resident: 16,
                transient: 4,
            },
        ),
        ("default", ChurnConfig::default()),
        (
            "large",
            ChurnConfig {
                resident: 1024,
                transient: 64,
            },
        ),
    ];

    for (label, config) in configs {
        group.throughput(Throughput::Elements(config.transient as u64));
        let mut scenario = ChurnScenario::with_config(config);
        scenario.setup();

        group.bench_function(BenchmarkId::new("round", label), |b| {
            b.iter(|| scenario.update());
        });

        scenario.teardown();
    }

    group.finish();
}

criterion_group!(benches, bench_mix, bench_churn);
criterion_main!(benches);
