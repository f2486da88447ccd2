//! Buffered overlap reader.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::store::{buffer_capacity, bytes_to_words};
use ovldb_codec::{
    decode_record, record_bytes, DumpFormat, Overlap, PayloadCodec, RecordFormat, StoreFormat,
};
use ovldb_storage::ByteReader;
use std::marker::PhantomData;
use std::path::Path;

/// A buffered reader of overlap records.
///
/// Mirrors the writer: refills a word buffer from the underlying stream -
/// either raw words or length-prefixed compressed blocks - and decodes
/// records out of it on demand. End of data is reported as `Ok(false)` or a
/// short batch count, never as an error, and reads past the end stay at the
/// end.
///
/// Random access via [`seek_overlap`](Self::seek_overlap) is available only
/// when the underlying file is plain and block compression is off.
///
/// # Example
///
/// ```no_run
/// use ovldb_codec::{Overlap, Payload32x5, StoreFormat};
/// use ovldb_core::{OverlapReader, StoreConfig};
/// use std::path::Path;
///
/// let config = StoreConfig::default();
/// let mut reader =
///     OverlapReader::<Payload32x5, StoreFormat>::open_store(Path::new("asm.ovb"), &config)
///         .unwrap();
/// let mut overlap = Overlap::default();
/// while reader.read_overlap(&mut overlap).unwrap() {
///     // ...
/// }
/// ```
pub struct OverlapReader<P: PayloadCodec, F: RecordFormat> {
    stream: ByteReader,
    buffer: Vec<u32>,
    pos: usize,
    len: usize,
    block_compressed: bool,
    seekable: bool,
    bytes: Vec<u8>,
    scratch: Vec<u8>,
    _payload: PhantomData<P>,
    _format: PhantomData<F>,
}

impl<P: PayloadCodec> OverlapReader<P, StoreFormat> {
    /// Opens a store file for reading.
    ///
    /// Store files are usually plain; a compression envelope is detected
    /// and handled transparently, at the cost of seekability.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open_store(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        Self::with_stream(ByteReader::open(path)?, config, false)
    }
}

impl<P: PayloadCodec> OverlapReader<P, DumpFormat> {
    /// Opens a dump file for reading.
    ///
    /// Block decompression is engaged per the configuration and must match
    /// how the file was written; a mismatch surfaces as block corruption on
    /// the first refill.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open_dump(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        Self::with_stream(ByteReader::open(path)?, config, config.block_compression)
    }
}

impl<P: PayloadCodec, F: RecordFormat> OverlapReader<P, F> {
    fn with_stream(
        stream: ByteReader,
        config: &StoreConfig,
        block_compressed: bool,
    ) -> CoreResult<Self> {
        let capacity = buffer_capacity::<P>(config.min_buffer_words);
        let seekable = stream.is_seekable() && !block_compressed;
        Ok(Self {
            stream,
            buffer: vec![0; capacity],
            pos: 0,
            len: 0,
            block_compressed,
            seekable,
            bytes: vec![0; capacity * 4],
            scratch: Vec::new(),
            _payload: PhantomData,
            _format: PhantomData,
        })
    }

    /// Returns the path of the overlap file being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.stream.path()
    }

    /// Returns whether [`seek_overlap`](Self::seek_overlap) is available.
    #[must_use]
    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Reads the next record into `overlap`.
    ///
    /// Returns `Ok(false)` at end of data, leaving `overlap` untouched.
    /// Store-format reads never touch `a_id` - it is implicit from the
    /// record's position in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if a refill fails or a block is corrupt.
    pub fn read_overlap(&mut self, overlap: &mut Overlap<P>) -> CoreResult<bool> {
        self.refill()?;
        if self.len == 0 {
            return Ok(false);
        }
        let used = decode_record::<F, P>(&self.buffer[self.pos..], overlap);
        self.pos += used;
        debug_assert!(self.pos <= self.len);
        Ok(true)
    }

    /// Reads up to `out.len()` records into `out`.
    ///
    /// Returns the number of records actually read, which is less than
    /// requested only at end of data.
    ///
    /// # Errors
    ///
    /// Returns an error if a refill fails or a block is corrupt.
    pub fn read_overlaps(&mut self, out: &mut [Overlap<P>]) -> CoreResult<usize> {
        let mut loaded = 0;
        while loaded < out.len() {
            if !self.read_overlap(&mut out[loaded])? {
                break;
            }
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Repositions the reader so the next read returns record `index`.
    ///
    /// The current buffer is invalidated; the next read refills from the
    /// new position.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotSeekable`] if the underlying file is
    /// compressed or block compression is engaged.
    pub fn seek_overlap(&mut self, index: u64) -> CoreResult<()> {
        if !self.seekable {
            return Err(CoreError::not_seekable(self.stream.path()));
        }
        self.stream
            .seek(index * record_bytes::<F, P>() as u64)?;
        self.pos = self.len;
        Ok(())
    }

    /// Returns a streaming iterator over the remaining records.
    ///
    /// The iterator stops at end of data and fuses after an error.
    pub fn overlaps(&mut self) -> Overlaps<'_, P, F> {
        Overlaps {
            reader: self,
            finished: false,
        }
    }

    /// Refills the word buffer once it has been consumed.
    fn refill(&mut self) -> CoreResult<()> {
        if self.pos < self.len {
            return Ok(());
        }
        self.pos = 0;
        self.len = 0;
        if self.block_compressed {
            self.refill_block()
        } else {
            self.refill_raw()
        }
    }

    fn refill_raw(&mut self) -> CoreResult<()> {
        let got = self.stream.read_into(&mut self.bytes)?;
        if got == 0 {
            return Ok(());
        }
        if got % 4 != 0 {
            return Err(CoreError::block_corruption(
                self.stream.path(),
                format!("{got} bytes read is not a whole number of words"),
            ));
        }
        bytes_to_words(&self.bytes[..got], &mut self.buffer);
        self.len = got / 4;
        tracing::debug!(words = self.len, "refilled raw block");
        Ok(())
    }

    fn refill_block(&mut self) -> CoreResult<()> {
        let mut prefix = [0u8; 8];
        let got = self.stream.read_into(&mut prefix)?;
        if got == 0 {
            return Ok(());
        }
        if got < prefix.len() {
            return Err(CoreError::block_corruption(
                self.stream.path(),
                format!("truncated block length prefix: got {got} of 8 bytes"),
            ));
        }

        let compressed = u64::from_le_bytes(prefix);
        let bound = zstd::zstd_safe::compress_bound(self.bytes.len()) as u64;
        if compressed == 0 || compressed > bound {
            return Err(CoreError::block_corruption(
                self.stream.path(),
                format!("implausible block length {compressed}"),
            ));
        }

        let compressed = compressed as usize;
        if self.scratch.len() < compressed {
            self.scratch.resize(compressed, 0);
        }
        self.stream.read_exact_into(&mut self.scratch[..compressed])?;

        let decompressed =
            zstd::bulk::decompress_to_buffer(&self.scratch[..compressed], &mut self.bytes[..])
                .map_err(|e| {
                    CoreError::block_corruption(
                        self.stream.path(),
                        format!("block does not decompress: {e}"),
                    )
                })?;
        if decompressed % 4 != 0 {
            return Err(CoreError::block_corruption(
                self.stream.path(),
                format!("{decompressed} decompressed bytes is not a whole number of words"),
            ));
        }

        bytes_to_words(&self.bytes[..decompressed], &mut self.buffer);
        self.len = decompressed / 4;
        tracing::debug!(
            words = self.len,
            bytes = compressed,
            "refilled compressed block"
        );
        Ok(())
    }
}

impl<P: PayloadCodec, F: RecordFormat> std::fmt::Debug for OverlapReader<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapReader")
            .field("path", &self.stream.path())
            .field("format", &F::NAME)
            .field("seekable", &self.seekable)
            .field("block_compressed", &self.block_compressed)
            .finish_non_exhaustive()
    }
}

/// Streaming iterator over a reader's remaining records.
///
/// Yields `CoreResult<Overlap<P>>`; store-format records carry a default
/// `a_id`, as that id is implicit from position.
pub struct Overlaps<'a, P: PayloadCodec, F: RecordFormat> {
    reader: &'a mut OverlapReader<P, F>,
    finished: bool,
}

impl<P: PayloadCodec, F: RecordFormat> Iterator for Overlaps<'_, P, F> {
    type Item = CoreResult<Overlap<P>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut overlap = Overlap::default();
        match self.reader.read_overlap(&mut overlap) {
            Ok(true) => Some(Ok(overlap)),
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
