//! Record codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ovldb_bench::utils::random_overlaps;
use ovldb_codec::{
    decode_record, encode_record, record_bytes, DumpFormat, Overlap, Payload32x5, Payload64x3,
};

/// Benchmark encoding a batch of dump-format records.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_encode");
    let records = random_overlaps::<Payload32x5>(1024, 1_000_000);
    let mut wire = vec![0u32; 1024 * 7];

    group.throughput(Throughput::Bytes(
        (1024 * record_bytes::<DumpFormat, Payload32x5>()) as u64,
    ));
    group.bench_function("32x5", |b| {
        b.iter(|| {
            let mut used = 0;
            for record in &records {
                used += encode_record::<DumpFormat, _>(black_box(record), &mut wire[used..]);
            }
            black_box(used);
        });
    });
    group.finish();
}

/// Benchmark decoding a batch of dump-format records.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decode");
    let records = random_overlaps::<Payload32x5>(1024, 1_000_000);
    let mut wire = vec![0u32; 1024 * 7];
    let mut used = 0;
    for record in &records {
        used += encode_record::<DumpFormat, _>(record, &mut wire[used..]);
    }

    group.throughput(Throughput::Bytes(
        (1024 * record_bytes::<DumpFormat, Payload32x5>()) as u64,
    ));
    group.bench_function("32x5", |b| {
        b.iter(|| {
            let mut overlap = Overlap::default();
            let mut pos = 0;
            while pos < used {
                pos += decode_record::<DumpFormat, Payload32x5>(&wire[pos..], &mut overlap);
            }
            black_box(overlap);
        });
    });
    group.finish();
}

/// Benchmark the 64-bit payload's word splitting.
fn bench_wide_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_wide_payload");
    let records = random_overlaps::<Payload64x3>(1024, 1_000_000);
    let mut wire = vec![0u32; 1024 * 8];

    group.throughput(Throughput::Bytes(
        (1024 * record_bytes::<DumpFormat, Payload64x3>()) as u64,
    ));
    group.bench_function("64x3", |b| {
        b.iter(|| {
            let mut used = 0;
            for record in &records {
                used += encode_record::<DumpFormat, _>(black_box(record), &mut wire[used..]);
            }
            black_box(used);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_wide_payload);
criterion_main!(benches);
