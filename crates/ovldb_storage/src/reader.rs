//! Transparent decompressing input stream.

use crate::error::{StorageError, StorageResult};
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Size of the decode window, in bytes.
const WINDOW_SIZE: usize = 32 * 1024;

/// Magic bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
/// Magic bytes of a bzip2 stream.
const BZIP2_MAGIC: [u8; 3] = *b"BZh";

/// The underlying byte source, after envelope detection.
enum Source {
    /// A plain uncompressed file. The only file-backed source that seeks.
    Plain(File),
    /// A gzip-compressed file, possibly with concatenated members.
    Gzip(MultiGzDecoder<BufReader<File>>),
    /// A bzip2-compressed file, possibly with concatenated streams.
    Bzip2(MultiBzDecoder<BufReader<File>>),
    /// An in-memory byte vector, for tests and tools.
    Memory(Cursor<Vec<u8>>),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Plain(f) => f.read(buf),
            Source::Gzip(d) => d.read(buf),
            Source::Bzip2(d) => d.read(buf),
            Source::Memory(c) => c.read(buf),
        }
    }
}

/// A byte-addressable cursor over the decompressed content of one file.
///
/// Opening a file auto-detects a gzip or bzip2 envelope from the leading
/// magic bytes and decompresses transparently; anything else is read as-is.
/// The cursor refills an internal decode window as it moves, so callers see
/// a uniform stream of decompressed bytes regardless of the envelope.
///
/// Once the end of the stream is reached, all operations become idempotent
/// no-ops that keep reporting end-of-stream.
///
/// # Example
///
/// ```no_run
/// use ovldb_storage::ByteReader;
/// use std::path::Path;
///
/// let mut stream = ByteReader::open(Path::new("overlaps.dat.gz")).unwrap();
/// while !stream.at_end() {
///     let byte = stream.take().unwrap();
///     // ...
/// }
/// ```
pub struct ByteReader {
    path: PathBuf,
    source: Source,
    window: Vec<u8>,
    window_pos: usize,
    window_len: usize,
    position: u64,
    at_end: bool,
}

impl ByteReader {
    /// Opens a file for reading, auto-detecting the compression envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the first decode
    /// window cannot be filled.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut file = File::open(path).map_err(|e| StorageError::io(path, e))?;

        let mut magic = [0u8; 3];
        let mut got = 0;
        while got < magic.len() {
            match file.read(&mut magic[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StorageError::io(path, e)),
            }
        }
        file.seek(SeekFrom::Start(0))
            .map_err(|e| StorageError::io(path, e))?;

        let source = if got >= 2 && magic[..2] == GZIP_MAGIC {
            Source::Gzip(MultiGzDecoder::new(BufReader::new(file)))
        } else if got >= 3 && magic == BZIP2_MAGIC {
            Source::Bzip2(MultiBzDecoder::new(BufReader::new(file)))
        } else {
            Source::Plain(file)
        };

        Self::with_source(path.to_path_buf(), source)
    }

    /// Wraps an in-memory byte vector in the same cursor interface.
    ///
    /// The memory stream is seekable and reports itself as uncompressed.
    /// This is the stream double used by tests (and by tools that already
    /// hold the bytes).
    pub fn from_bytes(bytes: Vec<u8>) -> StorageResult<Self> {
        Self::with_source(PathBuf::from("<memory>"), Source::Memory(Cursor::new(bytes)))
    }

    fn with_source(path: PathBuf, source: Source) -> StorageResult<Self> {
        let mut reader = Self {
            path,
            source,
            window: vec![0u8; WINDOW_SIZE],
            window_pos: 0,
            window_len: 0,
            position: 0,
            at_end: false,
        };
        reader.fill_window()?;
        Ok(reader)
    }

    /// Returns the path this stream was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the underlying file carries a compression envelope.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self.source, Source::Gzip(_) | Source::Bzip2(_))
    }

    /// Returns whether the stream supports [`seek`](Self::seek).
    #[must_use]
    pub fn is_seekable(&self) -> bool {
        matches!(self.source, Source::Plain(_) | Source::Memory(_))
    }

    /// Returns whether the end of the decompressed stream has been reached.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Returns the cursor offset within the decompressed stream.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the byte under the cursor, or 0 past the end of the stream.
    #[must_use]
    pub fn current(&self) -> u8 {
        if self.at_end {
            0
        } else {
            self.window[self.window_pos]
        }
    }

    /// Moves the cursor one byte forward.
    ///
    /// Returns whether the end of the stream has been reached. Calling this
    /// past the end of the stream is a no-op returning `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if refilling the decode window fails.
    pub fn advance(&mut self) -> StorageResult<bool> {
        if self.at_end {
            return Ok(true);
        }
        self.window_pos += 1;
        self.position += 1;
        if self.window_pos >= self.window_len {
            self.fill_window()?;
        }
        Ok(self.at_end)
    }

    /// Returns the byte under the cursor and moves the cursor forward.
    ///
    /// # Errors
    ///
    /// Returns an error if refilling the decode window fails.
    pub fn take(&mut self) -> StorageResult<u8> {
        let byte = self.current();
        self.advance()?;
        Ok(byte)
    }

    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// Returns the number of bytes actually read, which is less than the
    /// requested length only at the end of the stream. End-of-stream is not
    /// an error; subsequent calls keep returning 0.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying read fails.
    pub fn read_into(&mut self, buf: &mut [u8]) -> StorageResult<usize> {
        let mut copied = 0;
        while copied < buf.len() && !self.at_end {
            if self.window_pos >= self.window_len {
                self.fill_window()?;
                continue;
            }
            let n = (self.window_len - self.window_pos).min(buf.len() - copied);
            buf[copied..copied + n]
                .copy_from_slice(&self.window[self.window_pos..self.window_pos + n]);
            self.window_pos += n;
            self.position += n as u64;
            copied += n;
        }
        if self.window_pos >= self.window_len && !self.at_end {
            self.fill_window()?;
        }
        Ok(copied)
    }

    /// Reads exactly `buf.len()` bytes into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ShortRead`] with the requested and actual
    /// counts if the stream ends first.
    pub fn read_exact_into(&mut self, buf: &mut [u8]) -> StorageResult<()> {
        let got = self.read_into(buf)?;
        if got < buf.len() {
            return Err(StorageError::short_read(
                &self.path,
                buf.len() as u64,
                got as u64,
            ));
        }
        Ok(())
    }

    /// Repositions the cursor to `offset` within the stream.
    ///
    /// Only plain files and memory streams support this; the decode window
    /// is refilled from the new position.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotSeekable`] for compressed envelopes, or an
    /// I/O error if the reposition fails.
    pub fn seek(&mut self, offset: u64) -> StorageResult<()> {
        match &mut self.source {
            Source::Plain(f) => {
                f.seek(SeekFrom::Start(offset))
                    .map_err(|e| StorageError::io(&self.path, e))?;
            }
            Source::Memory(c) => c.set_position(offset),
            Source::Gzip(_) | Source::Bzip2(_) => {
                return Err(StorageError::not_seekable(&self.path));
            }
        }
        self.at_end = false;
        self.position = offset;
        self.fill_window()
    }

    /// Refills the decode window from the source.
    ///
    /// Sets the sticky end-of-stream flag when the source is exhausted.
    fn fill_window(&mut self) -> StorageResult<()> {
        self.window_pos = 0;
        self.window_len = 0;
        if self.at_end {
            return Ok(());
        }
        loop {
            match self.source.read(&mut self.window) {
                Ok(0) => {
                    self.at_end = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.window_len = n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StorageError::io(&self.path, e)),
            }
        }
    }
}

impl std::fmt::Debug for ByteReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteReader")
            .field("path", &self.path)
            .field("position", &self.position)
            .field("at_end", &self.at_end)
            .finish_non_exhaustive()
    }
}
