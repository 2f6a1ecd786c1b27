//! Training benchmarks for sparse-lr.
//!
//! Benchmarks cover:
//! - Column store construction
//! - A single coordinate descent sweep
//! - Full training at several sparsity levels
//!
//! # Running benchmarks
//!
//! ```bash
//! cargo bench --bench training
//! ```
//!
//! # Results
//!
//! HTML reports are generated in `target/criterion/`.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::prelude::*;

use sparse_lr::data::ColumnStore;
use sparse_lr::training::{
    CoordinateLipschitzGradientOptimizer, L2RegularizerLoss, LinearCombineLoss, LogisticLoss,
    OptimizerConfig, Verbosity,
};
use sparse_lr::{Instance, LogisticRegressionTrainer, SparseVector};

// =============================================================================
// Benchmark Data Setup
// =============================================================================

/// Generate random sparse binary classification data.
///
/// Each feature is present with probability `density`.
fn generate_instances(num_rows: usize, num_features: usize, density: f64, seed: u64) -> Vec<Instance> {
    let mut rng = StdRng::seed_from_u64(seed);

    let true_weights: Vec<f64> = (0..num_features).map(|_| rng.r#gen::<f64>() * 2.0 - 1.0).collect();

    (0..num_rows)
        .map(|_| {
            let entries: Vec<(u32, f64)> = (0..num_features as u32)
                .filter(|_| rng.r#gen::<f64>() < density)
                .map(|j| (j, rng.r#gen::<f64>() * 2.0 - 1.0))
                .collect();
            let features = SparseVector::from_entries(entries).expect("unique indices");
            let score = features.dot_dense(&true_weights);
            let label = if score + rng.r#gen::<f64>() - 0.5 > 0.0 { 1.0 } else { 0.0 };
            Instance::new(features, label)
        })
        .collect()
}

fn bench_config() -> OptimizerConfig {
    OptimizerConfig {
        max_sweeps: 20,
        verbosity: Verbosity::Silent,
        ..Default::default()
    }
}

fn build_loss(instances: &[Instance], num_features: usize) -> LinearCombineLoss {
    let mut loss = LinearCombineLoss::new();
    loss.add(LogisticLoss::new(num_features, instances, true).expect("valid instances"))
        .expect("first loss")
        .add(L2RegularizerLoss::new(num_features + 1, true))
        .expect("matching dimension");
    loss
}

// =============================================================================
// Column Store
// =============================================================================

fn bench_column_store(c: &mut Criterion) {
    let num_features = 1_000;
    let mut group = c.benchmark_group("column_store");

    for num_rows in [1_000, 10_000, 50_000] {
        let instances = generate_instances(num_rows, num_features, 0.01, 42);
        let nnz: usize = instances.iter().map(|x| x.features().nnz()).sum();
        group.throughput(Throughput::Elements(nnz as u64));

        group.bench_with_input(BenchmarkId::new("build", num_rows), &instances, |b, instances| {
            b.iter(|| {
                let store = ColumnStore::from_instances(black_box(instances), num_features, true);
                black_box(store)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Sweeps
// =============================================================================

/// One sweep after initialization. The first sweep does the most work, so
/// the loss is rebuilt per iteration outside the timed section.
fn bench_single_sweep(c: &mut Criterion) {
    let num_features = 1_000;
    let mut group = c.benchmark_group("sweep");

    for num_rows in [1_000, 10_000] {
        let instances = generate_instances(num_rows, num_features, 0.01, 7);
        let nnz: usize = instances.iter().map(|x| x.features().nnz()).sum();
        group.throughput(Throughput::Elements(nnz as u64));

        group.bench_with_input(BenchmarkId::new("first", num_rows), &instances, |b, instances| {
            b.iter_batched(
                || build_loss(instances, num_features),
                |mut loss| {
                    let mut optimizer = CoordinateLipschitzGradientOptimizer::new(&mut loss, bench_config());
                    black_box(optimizer.sweep())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Full Training
// =============================================================================

fn bench_full_training(c: &mut Criterion) {
    let num_features = 500;
    let num_rows = 10_000;
    let mut group = c.benchmark_group("train");
    group.sample_size(10);

    for density in [0.005, 0.02, 0.1] {
        let instances = generate_instances(num_rows, num_features, density, 11);
        let trainer = LogisticRegressionTrainer {
            lambda: 1.0,
            optimizer: bench_config(),
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::new("density", density), &instances, |b, instances| {
            b.iter(|| {
                let model = trainer.train(num_features, black_box(instances)).expect("training");
                black_box(model)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_column_store, bench_single_sweep, bench_full_training);
criterion_main!(benches);
