use criterion::{black_box, criterion_group, criterion_main, Criterion};
use readmap_core::{generate_seeds, ReadAligner, ReferenceIndex, SearchParams, UniqueReadIndex};

/// Deterministic pseudo-random sequence so buckets stay informative
/// (a short repeated pattern would trip the repeat cutoff everywhere).
fn generate_test_sequence(length: usize, mut state: u64) -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut sequence = Vec::with_capacity(length);
    for _ in 0..length {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        sequence.push(BASES[(state >> 33) as usize % 4]);
    }
    sequence
}

fn bench_index_build(c: &mut Criterion) {
    let reference = generate_test_sequence(100_000, 1);

    c.bench_function("index_build_100kb", |b| {
        b.iter(|| {
            let index = ReferenceIndex::build(black_box(&reference), 8);
            black_box(index)
        })
    });
}

fn bench_seed_generation(c: &mut Criterion) {
    let reference = generate_test_sequence(100_000, 1);
    let index = ReferenceIndex::build(&reference, 8).unwrap();
    let read = reference[5_000..5_450].to_vec();
    let params = SearchParams::default();

    c.bench_function("seed_generation_450bp", |b| {
        b.iter(|| {
            let seeds = generate_seeds(black_box(&read), &index, &params);
            black_box(seeds)
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let reference = generate_test_sequence(10_000, 1);
    let index = ReferenceIndex::build(&reference, 8).unwrap();
    let params = SearchParams::default();

    let mut reads = UniqueReadIndex::new();
    for i in 0..50 {
        let start = (i * 137) % (reference.len() - 450);
        reads.insert(reference[start..start + 450].to_vec());
    }

    c.bench_function("pipeline_50_reads", |b| {
        b.iter(|| {
            let aligner = ReadAligner::new(&reference, &index, params.clone()).unwrap();
            let result = aligner.align_all(black_box(&reads));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_index_build, bench_seed_generation, bench_pipeline);
criterion_main!(benches);
