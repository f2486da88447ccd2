//! Buffered overlap writer.

use crate::config::StoreConfig;
use crate::counts::{counts_path, CountTable};
use crate::error::CoreResult;
use crate::store::{buffer_capacity, words_to_bytes};
use ovldb_codec::{encode_record, DumpFormat, Overlap, PayloadCodec, RecordFormat, StoreFormat};
use ovldb_storage::ByteWriter;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A buffered writer of overlap records.
///
/// Records accumulate in a word buffer sized per the store's alignment
/// invariant; full buffers are flushed to the underlying stream, optionally
/// through block compression. Dump writers additionally accumulate
/// per-participant counts and serialize them to the sibling `<base>.counts`
/// file when the writer finishes.
///
/// Call [`finish`](Self::finish) to complete the file. Dropping an
/// unfinished writer flushes and closes best-effort, logging any failure -
/// a dropped writer cannot report one.
///
/// # Example
///
/// ```no_run
/// use ovldb_codec::{Overlap, Payload32x5, ReadId};
/// use ovldb_core::{OverlapWriter, StoreConfig};
/// use std::path::Path;
///
/// let config = StoreConfig::default();
/// let mut writer =
///     OverlapWriter::<Payload32x5, _>::create_dump(Path::new("asm.ovb"), &config).unwrap();
/// writer
///     .write_overlap(&Overlap::new(ReadId::new(1), ReadId::new(2), Payload32x5::default()))
///     .unwrap();
/// writer.finish().unwrap();
/// ```
pub struct OverlapWriter<P: PayloadCodec, F: RecordFormat> {
    sink: ByteWriter,
    buffer: Vec<u32>,
    len: usize,
    counts: Option<CountTable>,
    counts_path: PathBuf,
    compress: bool,
    level: i32,
    bytes: Vec<u8>,
    scratch: Vec<u8>,
    finished: bool,
    _payload: PhantomData<P>,
    _format: PhantomData<F>,
}

impl<P: PayloadCodec> OverlapWriter<P, StoreFormat> {
    /// Creates a store-format writer: no first id on the wire, no count
    /// side-channel, no block compression.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create_store(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        Self::with_sink(ByteWriter::create(path)?, config, false, None)
    }
}

impl<P: PayloadCodec> OverlapWriter<P, DumpFormat> {
    /// Creates a dump-format writer: both ids on the wire, per-participant
    /// counts, block compression per the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create_dump(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        Self::with_sink(
            ByteWriter::create(path)?,
            config,
            config.block_compression,
            Some(CountTable::new()),
        )
    }
}

impl<P: PayloadCodec, F: RecordFormat> OverlapWriter<P, F> {
    fn with_sink(
        sink: ByteWriter,
        config: &StoreConfig,
        compress: bool,
        counts: Option<CountTable>,
    ) -> CoreResult<Self> {
        let capacity = buffer_capacity::<P>(config.min_buffer_words);
        let counts_path = counts_path(sink.path());
        Ok(Self {
            sink,
            buffer: vec![0; capacity],
            len: 0,
            counts,
            counts_path,
            compress,
            level: config.compression_level,
            bytes: Vec::new(),
            scratch: Vec::new(),
            finished: false,
            _payload: PhantomData,
            _format: PhantomData,
        })
    }

    /// Returns the path of the overlap file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.sink.path()
    }

    /// Writes one overlap record.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer flush fails.
    pub fn write_overlap(&mut self, overlap: &Overlap<P>) -> CoreResult<()> {
        if let Some(counts) = &mut self.counts {
            counts.record(overlap.a_id, overlap.b_id);
        }
        let used = encode_record::<F, P>(overlap, &mut self.buffer[self.len..]);
        self.len += used;
        debug_assert!(self.len <= self.buffer.len());
        self.flush(false)
    }

    /// Writes a batch of overlap records.
    ///
    /// The count table is grown at most once, over the ids of the entire
    /// batch, instead of once per record.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer flush fails.
    pub fn write_overlaps(&mut self, overlaps: &[Overlap<P>]) -> CoreResult<()> {
        if let Some(counts) = &mut self.counts {
            if let Some(max_id) = overlaps.iter().map(|ov| ov.a_id.max(ov.b_id)).max() {
                counts.ensure(max_id);
            }
        }

        for overlap in overlaps {
            if let Some(counts) = &mut self.counts {
                counts.increment(overlap.a_id, overlap.b_id);
            }
            let used = encode_record::<F, P>(overlap, &mut self.buffer[self.len..]);
            self.len += used;
            self.flush(false)?;
        }
        debug_assert!(self.len <= self.buffer.len());
        Ok(())
    }

    /// Flushes the word buffer to the underlying stream.
    ///
    /// Without `force`, this only writes once the buffer is full, which is
    /// what keeps every flush unit record-aligned. An empty buffer is
    /// always a no-op, so the close path may call this unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if compression or the write fails.
    pub fn flush(&mut self, force: bool) -> CoreResult<()> {
        if self.len == 0 {
            return Ok(());
        }
        if !force && self.len < self.buffer.len() {
            return Ok(());
        }

        words_to_bytes(&self.buffer[..self.len], &mut self.bytes);

        if self.compress {
            let bound = zstd::zstd_safe::compress_bound(self.bytes.len());
            if self.scratch.len() < bound {
                self.scratch.resize(bound, 0);
            }
            let compressed =
                zstd::bulk::compress_to_buffer(&self.bytes, &mut self.scratch[..], self.level)?;

            self.sink.write_all(&(compressed as u64).to_le_bytes())?;
            self.sink.write_all(&self.scratch[..compressed])?;
            tracing::debug!(words = self.len, bytes = compressed, "flushed compressed block");
        } else {
            self.sink.write_all(&self.bytes)?;
            tracing::debug!(words = self.len, "flushed block");
        }

        self.len = 0;
        Ok(())
    }

    /// Force-flushes, seals the stream, and writes the counts file.
    ///
    /// This is the supported way to complete an overlap file; it reports
    /// the failures a destructor would have to swallow.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush, the stream seal, or the counts
    /// write fails.
    pub fn finish(mut self) -> CoreResult<()> {
        self.close()
    }

    fn close(&mut self) -> CoreResult<()> {
        if self.finished {
            return Ok(());
        }
        self.flush(true)?;
        self.sink.try_finish()?;
        if let Some(counts) = self.counts.take() {
            counts.save(&self.counts_path)?;
            tracing::debug!(
                path = %self.counts_path.display(),
                last_id = counts.last_id(),
                "wrote count table"
            );
        }
        self.finished = true;
        Ok(())
    }
}

impl<P: PayloadCodec, F: RecordFormat> Drop for OverlapWriter<P, F> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.close() {
                tracing::error!(
                    path = %self.sink.path().display(),
                    error = %e,
                    "failed to close overlap writer on drop"
                );
            }
        }
    }
}

impl<P: PayloadCodec, F: RecordFormat> std::fmt::Debug for OverlapWriter<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapWriter")
            .field("path", &self.sink.path())
            .field("format", &F::NAME)
            .field("buffered_words", &self.len)
            .field("capacity", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::CountTable;
    use ovldb_codec::{record_bytes, Payload32x5, ReadId};
    use tempfile::tempdir;

    fn overlap(a: u32, b: u32, seed: u32) -> Overlap<Payload32x5> {
        Overlap::new(
            ReadId::new(a),
            ReadId::new(b),
            Payload32x5([seed, seed + 1, seed + 2, seed + 3, seed + 4]),
        )
    }

    #[test]
    fn store_writer_emits_raw_words() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");
        let config = StoreConfig::default();

        let mut writer = OverlapWriter::<Payload32x5, StoreFormat>::create_store(&path, &config)
            .unwrap();
        for i in 0..3 {
            writer.write_overlap(&overlap(100, 200 + i, i)).unwrap();
        }
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 3 * record_bytes::<StoreFormat, Payload32x5>());
        // First word of the first record is b_id; a_id is not on the wire.
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 200);
    }

    #[test]
    fn store_writer_has_no_counts_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");

        let writer = OverlapWriter::<Payload32x5, StoreFormat>::create_store(
            &path,
            &StoreConfig::default(),
        )
        .unwrap();
        writer.finish().unwrap();

        assert!(!dir.path().join("asm.counts").exists());
    }

    #[test]
    fn dump_writer_writes_counts_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");
        let config = StoreConfig::default();

        let mut writer =
            OverlapWriter::<Payload32x5, DumpFormat>::create_dump(&path, &config).unwrap();
        writer.write_overlap(&overlap(0, 1, 0)).unwrap();
        writer.write_overlap(&overlap(5, 5, 0)).unwrap();
        writer.write_overlap(&overlap(1_000_000, 1, 0)).unwrap();
        writer.finish().unwrap();

        let counts = CountTable::load(&dir.path().join("asm.counts")).unwrap();
        assert_eq!(counts.len(), 1_000_002);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[1], 2);
        assert_eq!(counts[5], 2);
        assert_eq!(counts[1_000_000], 1);
        assert_eq!(counts[1_000_001], 0);
        assert_eq!(counts.iter().map(|&c| u64::from(c)).sum::<u64>(), 6);
    }

    #[test]
    fn counts_file_name_strips_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb.gz");

        let mut writer = OverlapWriter::<Payload32x5, DumpFormat>::create_dump(
            &path,
            &StoreConfig::default(),
        )
        .unwrap();
        writer.write_overlap(&overlap(1, 2, 0)).unwrap();
        writer.finish().unwrap();

        assert!(dir.path().join("asm.counts").exists());
    }

    #[test]
    fn batch_write_matches_single_writes() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new().block_compression(false);
        let records: Vec<_> = (0..100).map(|i| overlap(i, i * 3 % 50, i)).collect();

        let single = dir.path().join("single.ovb");
        let mut writer =
            OverlapWriter::<Payload32x5, DumpFormat>::create_dump(&single, &config).unwrap();
        for r in &records {
            writer.write_overlap(r).unwrap();
        }
        writer.finish().unwrap();

        let batch = dir.path().join("batch.ovb");
        let mut writer =
            OverlapWriter::<Payload32x5, DumpFormat>::create_dump(&batch, &config).unwrap();
        writer.write_overlaps(&records).unwrap();
        writer.finish().unwrap();

        assert_eq!(
            std::fs::read(&single).unwrap(),
            std::fs::read(&batch).unwrap()
        );
        assert_eq!(
            std::fs::read(dir.path().join("single.counts")).unwrap(),
            std::fs::read(dir.path().join("batch.counts")).unwrap()
        );
    }

    #[test]
    fn compressed_flush_unit_is_length_prefixed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");
        let config = StoreConfig::default();

        let mut writer =
            OverlapWriter::<Payload32x5, DumpFormat>::create_dump(&path, &config).unwrap();
        writer.write_overlap(&overlap(1, 2, 7)).unwrap();
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let prefix = u64::from_le_bytes(bytes[..8].try_into().unwrap());
        assert_eq!(bytes.len() as u64, 8 + prefix);

        let record = record_bytes::<DumpFormat, Payload32x5>();
        let decompressed = zstd::bulk::decompress(&bytes[8..], record * 2).unwrap();
        assert_eq!(decompressed.len(), record);
    }

    #[test]
    fn forced_flush_on_empty_buffer_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");

        let mut writer = OverlapWriter::<Payload32x5, StoreFormat>::create_store(
            &path,
            &StoreConfig::default(),
        )
        .unwrap();
        writer.write_overlap(&overlap(1, 2, 0)).unwrap();
        writer.flush(true).unwrap();
        writer.flush(true).unwrap();
        writer.flush(true).unwrap();
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), record_bytes::<StoreFormat, Payload32x5>());
    }

    #[test]
    fn drop_closes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asm.ovb");

        {
            let mut writer = OverlapWriter::<Payload32x5, DumpFormat>::create_dump(
                &path,
                &StoreConfig::new().block_compression(false),
            )
            .unwrap();
            writer.write_overlap(&overlap(3, 4, 9)).unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), record_bytes::<DumpFormat, Payload32x5>());
        assert!(dir.path().join("asm.counts").exists());
    }
}
