//! Overlap store write/read benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ovldb_bench::utils::random_overlaps;
use ovldb_codec::{record_bytes, DumpFormat, Overlap, Payload32x5};
use ovldb_core::{OverlapReader, OverlapWriter, StoreConfig};
use tempfile::TempDir;

const BATCH: usize = 10_000;

fn config(compressed: bool) -> StoreConfig {
    StoreConfig::new().block_compression(compressed)
}

/// Benchmark writing a batch of dump records, raw and compressed.
fn bench_dump_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump_write");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(
        (BATCH * record_bytes::<DumpFormat, Payload32x5>()) as u64,
    ));

    let records = random_overlaps::<Payload32x5>(BATCH, 1_000_000);

    for compressed in [false, true] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if compressed { "compressed" } else { "raw" }),
            &compressed,
            |b, &compressed| {
                let dir = TempDir::new().unwrap();
                let path = dir.path().join("bench.ovb");
                b.iter(|| {
                    let mut writer = OverlapWriter::<Payload32x5, DumpFormat>::create_dump(
                        &path,
                        &config(compressed),
                    )
                    .unwrap();
                    writer.write_overlaps(black_box(&records)).unwrap();
                    writer.finish().unwrap();
                });
            },
        );
    }
    group.finish();
}

/// Benchmark reading a batch of dump records back, raw and compressed.
fn bench_dump_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump_read");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(
        (BATCH * record_bytes::<DumpFormat, Payload32x5>()) as u64,
    ));

    let records = random_overlaps::<Payload32x5>(BATCH, 1_000_000);

    for compressed in [false, true] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if compressed { "compressed" } else { "raw" }),
            &compressed,
            |b, &compressed| {
                let dir = TempDir::new().unwrap();
                let path = dir.path().join("bench.ovb");
                let mut writer = OverlapWriter::<Payload32x5, DumpFormat>::create_dump(
                    &path,
                    &config(compressed),
                )
                .unwrap();
                writer.write_overlaps(&records).unwrap();
                writer.finish().unwrap();

                let mut out = vec![Overlap::default(); BATCH];
                b.iter(|| {
                    let mut reader = OverlapReader::<Payload32x5, DumpFormat>::open_dump(
                        &path,
                        &config(compressed),
                    )
                    .unwrap();
                    let loaded = reader.read_overlaps(black_box(&mut out)).unwrap();
                    assert_eq!(loaded, BATCH);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_dump_write, bench_dump_read);
criterion_main!(benches);
