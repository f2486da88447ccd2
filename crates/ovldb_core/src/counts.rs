//! Per-participant overlap counts.
//!
//! Dump files carry a side-channel: while writing full-format overlaps, the
//! store accumulates how many overlaps each read participates in. The table
//! is serialized to a sibling `<base>.counts` file when the writer finishes,
//! where `<base>` is the overlap file's path with all trailing dotted
//! extensions stripped. Store files do not need this - the store itself
//! knows how many overlaps each read has.

use crate::error::{CoreError, CoreResult};
use ovldb_codec::ReadId;
use ovldb_storage::{ByteReader, ByteWriter};
use std::path::{Path, PathBuf};

/// Initial table capacity, in entries.
const INITIAL_CAPACITY: usize = 128 * 1024;

/// A growable table of per-read overlap counts.
///
/// Indexed directly by read id. Grows geometrically (by a quarter of the
/// current capacity per step) whenever an incoming id exceeds the current
/// capacity; growth preserves existing counts and zero-fills new slots.
#[derive(Debug)]
pub struct CountTable {
    counts: Vec<u32>,
    last_id: u32,
}

impl Default for CountTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CountTable {
    /// Creates an empty table with the initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: vec![0; INITIAL_CAPACITY],
            last_id: 0,
        }
    }

    /// Returns the largest read id seen so far.
    #[must_use]
    pub fn last_id(&self) -> u32 {
        self.last_id
    }

    /// Returns the count recorded for `id`.
    #[must_use]
    pub fn count(&self, id: ReadId) -> u32 {
        self.counts.get(id.as_index()).copied().unwrap_or(0)
    }

    /// Grows the table to cover `id` and raises the high-water mark.
    pub fn ensure(&mut self, id: ReadId) {
        let index = id.as_index();
        if index >= self.counts.len() {
            let mut capacity = self.counts.len();
            while capacity <= index {
                capacity += capacity / 4;
            }
            self.counts.resize(capacity, 0);
        }
        self.last_id = self.last_id.max(id.as_u32());
    }

    /// Increments the counts of both participants.
    ///
    /// The caller must have covered both ids with [`ensure`](Self::ensure)
    /// first; the batch write path does this once for a whole batch.
    pub fn increment(&mut self, a_id: ReadId, b_id: ReadId) {
        debug_assert!(a_id.as_index() < self.counts.len());
        debug_assert!(b_id.as_index() < self.counts.len());
        self.counts[a_id.as_index()] += 1;
        self.counts[b_id.as_index()] += 1;
    }

    /// Records one overlap: grows to cover both participants, then
    /// increments both counts.
    pub fn record(&mut self, a_id: ReadId, b_id: ReadId) {
        self.ensure(a_id.max(b_id));
        self.increment(a_id, b_id);
    }

    /// Serializes the table to `path`.
    ///
    /// The wire format is a 4-byte little-endian entry count equal to
    /// `last_id + 2`, followed by that many 4-byte little-endian counts in
    /// id order from 0. The extra trailing entry is always zero; it is part
    /// of the established format and preserved for compatibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let entries = self.last_id.saturating_add(2);

        let mut bytes = Vec::with_capacity(4 + 4 * entries as usize);
        bytes.extend_from_slice(&entries.to_le_bytes());
        for id in 0..entries {
            bytes.extend_from_slice(&self.count(ReadId::new(id)).to_le_bytes());
        }

        let mut sink = ByteWriter::create(path)?;
        sink.write_all(&bytes)?;
        sink.finish()?;
        Ok(())
    }

    /// Loads a serialized count table from `path`.
    ///
    /// Returns the counts in id order, as many as the header promised.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is shorter or longer than its header
    /// claims, or cannot be read.
    pub fn load(path: &Path) -> CoreResult<Vec<u32>> {
        let mut stream = ByteReader::open(path)?;

        let mut header = [0u8; 4];
        stream.read_exact_into(&mut header)?;
        let entries = u32::from_le_bytes(header) as usize;

        let expected = 4 + 4 * entries as u64;
        let actual = std::fs::metadata(path).map(|m| m.len()).unwrap_or(expected);
        if actual != expected {
            return Err(CoreError::counts_corruption(
                path,
                format!("header promises {entries} entries ({expected} bytes), file has {actual} bytes"),
            ));
        }

        let mut bytes = vec![0u8; entries * 4];
        stream.read_exact_into(&mut bytes)?;

        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

/// Returns `path` with all trailing dotted extensions stripped.
///
/// Only the final path component is considered: `tigs/asm.ovb.gz` becomes
/// `tigs/asm`.
#[must_use]
pub fn base_path(path: &Path) -> PathBuf {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let stem = match name.find('.') {
        Some(dot) => &name[..dot],
        None => name,
    };
    path.with_file_name(stem)
}

/// Returns the sibling counts-file path for an overlap file.
#[must_use]
pub fn counts_path(path: &Path) -> PathBuf {
    let base = base_path(path);
    let mut name = base
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_owned();
    name.push_str(".counts");
    base.with_file_name(name)
}
