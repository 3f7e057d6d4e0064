//! Transform and score throughput against the fixture model.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::prelude::*;
use safebalance::{DistressPredictor, RawRecord, transform};
use std::path::PathBuf;

fn random_records(n: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let divisions = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
    (0..n)
        .map(|i| {
            let mut values = [0.0; 18];
            for v in &mut values {
                *v = rng.gen_range(-1.0e5..1.0e6);
            }
            RawRecord::new()
                .with_indicators(values)
                .with_fyear(rng.gen_range(1999_i64..2019))
                .with_division(divisions[rng.gen_range(0..divisions.len())])
                .with_major_group(rng.gen_range(10_i64..99))
                .with_company_name(format!("Company {i}"))
        })
        .collect()
}

fn predictor() -> DistressPredictor {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../safebalance-model/tests/fixtures/stump_model.json");
    DistressPredictor::from_model_path(path).expect("fixture model loads")
}

fn bench_transform(c: &mut Criterion) {
    let records = random_records(1, 42);
    c.bench_function("transform", |b| {
        b.iter(|| transform(black_box(&records[0])))
    });
}

fn bench_batch(c: &mut Criterion) {
    let predictor = predictor();
    let mut group = c.benchmark_group("batch");
    for n in [100, 1_000, 10_000] {
        let records = random_records(n, 7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("sequential", n), &records, |b, r| {
            b.iter(|| predictor.run_batch(black_box(r)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &records, |b, r| {
            b.iter(|| predictor.run_batch_parallel(black_box(r)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_batch);
criterion_main!(benches);
