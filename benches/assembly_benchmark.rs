use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use overlap_assembler::{assemble, merge_all, AssemblyConfig, OverlapGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Random genome of `len` bases, shredded into every overlapping k-mer.
fn generate_kmers(len: usize, k: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bases = ['A', 'C', 'G', 'T'];
    let genome: String = (0..len).map(|_| bases[rng.gen_range(0..4)]).collect();
    (0..=len - k).map(|i| genome[i..i + k].to_string()).collect()
}

fn bench_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_construction");

    for len in [1_000, 10_000, 50_000] {
        let kmers = generate_kmers(len, 21, 42);
        group.bench_with_input(BenchmarkId::new("build", len), &kmers, |b, kmers| {
            b.iter(|| OverlapGraph::build(black_box(kmers)).unwrap());
        });
    }

    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    for len in [1_000, 10_000, 50_000] {
        let kmers = generate_kmers(len, 21, 7);
        let graph = OverlapGraph::build(&kmers).unwrap();
        group.bench_with_input(BenchmarkId::new("merge_all", len), &graph, |b, graph| {
            b.iter(|| {
                let mut graph = graph.clone();
                black_box(merge_all(&mut graph))
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.measurement_time(Duration::from_secs(10));

    for len in [200, 1_000] {
        let kmers = generate_kmers(len, 9, 1234);
        let config = AssemblyConfig {
            min_output_len: len / 2,
            ..AssemblyConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("assemble", len), &kmers, |b, kmers| {
            b.iter(|| assemble(black_box(kmers), &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_graph_construction,
    bench_compression,
    bench_full_pipeline
);
criterion_main!(benches);
