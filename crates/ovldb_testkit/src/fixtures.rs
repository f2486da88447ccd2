//! Test fixtures and overlap-file helpers.
//!
//! Provides convenience functions for building overlap files in temporary
//! directories and reading them back whole.

use ovldb_codec::{DumpFormat, Overlap, PayloadCodec, ReadId, StoreFormat};
use ovldb_core::{OverlapReader, OverlapWriter, StoreConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory for overlap files, cleaned up on drop.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp directory"),
        }
    }

    /// Returns a path for `name` inside the directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a temporary directory.
pub fn with_temp_dir<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let dir = TestDir::new();
    f(dir.dir.path())
}

/// A small test configuration: tiny buffers so even short record runs span
/// several flush units.
#[must_use]
pub fn small_config() -> StoreConfig {
    StoreConfig::new().min_buffer_words(64)
}

/// Builds a deterministic payload from a seed, for any payload layout.
#[must_use]
pub fn sample_payload<P: PayloadCodec>(seed: u32) -> P {
    let words: Vec<u32> = (0..P::WIRE_WORDS)
        .map(|i| seed.wrapping_mul(2_654_435_761).wrapping_add(i as u32))
        .collect();
    P::unpack(&words)
}

/// Builds `n` deterministic overlap records.
#[must_use]
pub fn sample_overlaps<P: PayloadCodec>(n: u32) -> Vec<Overlap<P>> {
    (0..n)
        .map(|i| {
            Overlap::new(
                ReadId::new(i / 4),
                ReadId::new((i * 13) % 101),
                sample_payload(i),
            )
        })
        .collect()
}

/// Writes `records` to a dump file at `path`.
pub fn write_dump<P: PayloadCodec>(path: &Path, records: &[Overlap<P>], config: &StoreConfig) {
    let mut writer =
        OverlapWriter::<P, DumpFormat>::create_dump(path, config).expect("failed to create dump");
    writer.write_overlaps(records).expect("failed to write");
    writer.finish().expect("failed to finish");
}

/// Writes `records` to a store file at `path`.
pub fn write_store<P: PayloadCodec>(path: &Path, records: &[Overlap<P>], config: &StoreConfig) {
    let mut writer = OverlapWriter::<P, StoreFormat>::create_store(path, config)
        .expect("failed to create store");
    writer.write_overlaps(records).expect("failed to write");
    writer.finish().expect("failed to finish");
}

/// Reads every record of a dump file.
#[must_use]
pub fn read_dump<P: PayloadCodec>(path: &Path, config: &StoreConfig) -> Vec<Overlap<P>> {
    let mut reader =
        OverlapReader::<P, DumpFormat>::open_dump(path, config).expect("failed to open dump");
    reader
        .overlaps()
        .collect::<Result<_, _>>()
        .expect("failed to read")
}

/// Reads every record of a store file.
#[must_use]
pub fn read_store<P: PayloadCodec>(path: &Path, config: &StoreConfig) -> Vec<Overlap<P>> {
    let mut reader =
        OverlapReader::<P, StoreFormat>::open_store(path, config).expect("failed to open store");
    reader
        .overlaps()
        .collect::<Result<_, _>>()
        .expect("failed to read")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovldb_codec::Payload32x5;

    #[test]
    fn sample_overlaps_are_deterministic() {
        let a = sample_overlaps::<Payload32x5>(10);
        let b = sample_overlaps::<Payload32x5>(10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn dump_helpers_roundtrip() {
        with_temp_dir(|dir| {
            let path = dir.join("asm.ovb");
            let records = sample_overlaps::<Payload32x5>(100);
            write_dump(&path, &records, &small_config());
            assert_eq!(read_dump::<Payload32x5>(&path, &small_config()), records);
        });
    }

    #[test]
    fn store_helpers_roundtrip_b_side() {
        with_temp_dir(|dir| {
            let path = dir.join("asm.ovb");
            let records = sample_overlaps::<Payload32x5>(100);
            write_store(&path, &records, &small_config());

            let output = read_store::<Payload32x5>(&path, &small_config());
            assert_eq!(output.len(), records.len());
            for (got, want) in output.iter().zip(&records) {
                assert_eq!(got.b_id, want.b_id);
                assert_eq!(got.payload, want.payload);
            }
        });
    }
}
