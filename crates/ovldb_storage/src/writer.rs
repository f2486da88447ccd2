//! Compression-selecting output stream.

use crate::error::{StorageError, StorageResult};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The underlying byte sink, after envelope selection.
enum Sink {
    /// A plain uncompressed file.
    Plain(File),
    /// A gzip-compressed file.
    Gzip(GzEncoder<File>),
    /// A bzip2-compressed file.
    Bzip2(BzEncoder<File>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(f) => f.write(buf),
            Sink::Gzip(e) => e.write(buf),
            Sink::Bzip2(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(f) => f.flush(),
            Sink::Gzip(e) => e.flush(),
            Sink::Bzip2(e) => e.flush(),
        }
    }
}

/// A write-side byte stream with compression selected by file extension.
///
/// Creating a writer at `overlaps.dat.gz` produces a gzip file, `.bz2` a
/// bzip2 file, anything else a plain file. Writes either accept every byte
/// or fail with a diagnostic naming the file and the requested and actual
/// counts; there are no silent short writes.
///
/// [`finish`](Self::finish) seals the compression envelope and must be
/// called to complete the file. Dropping an unfinished writer seals it
/// best-effort and logs any failure, but cannot report one.
pub struct ByteWriter {
    path: PathBuf,
    sink: Sink,
    finished: bool,
}

impl ByteWriter {
    /// Creates a file for writing, selecting compression by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
        let sink = match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Sink::Gzip(GzEncoder::new(file, flate2::Compression::default())),
            Some("bz2") => Sink::Bzip2(BzEncoder::new(file, bzip2::Compression::default())),
            _ => Sink::Plain(file),
        };
        Ok(Self {
            path: path.to_path_buf(),
            sink,
            finished: false,
        })
    }

    /// Returns the path this stream writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether writes pass through a compression envelope.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !matches!(self.sink, Sink::Plain(_))
    }

    /// Writes all of `data`, or fails with a diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ShortWrite`] if the sink stops accepting
    /// bytes, or an I/O error for anything else.
    pub fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut written = 0;
        while written < data.len() {
            match self.sink.write(&data[written..]) {
                Ok(0) => {
                    return Err(StorageError::short_write(
                        &self.path,
                        data.len() as u64,
                        written as u64,
                    ));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StorageError::io(&self.path, e)),
            }
        }
        Ok(())
    }

    /// Flushes buffered bytes through the envelope to the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> StorageResult<()> {
        self.sink.flush().map_err(|e| StorageError::io(&self.path, e))
    }

    /// Seals the compression envelope and syncs the file.
    ///
    /// # Errors
    ///
    /// Returns an error if finalizing the envelope or syncing fails.
    pub fn finish(mut self) -> StorageResult<()> {
        self.try_finish()
    }

    /// Non-consuming [`finish`](Self::finish), idempotent once it has
    /// succeeded. Callers that cannot give up ownership (drop guards,
    /// containers) use this; everyone else should prefer `finish`.
    ///
    /// # Errors
    ///
    /// Returns an error if finalizing the envelope or syncing fails.
    pub fn try_finish(&mut self) -> StorageResult<()> {
        if self.finished {
            return Ok(());
        }
        match &mut self.sink {
            Sink::Plain(f) => {
                f.flush().map_err(|e| StorageError::io(&self.path, e))?;
                f.sync_all().map_err(|e| StorageError::io(&self.path, e))?;
            }
            Sink::Gzip(e) => {
                e.try_finish().map_err(|e| StorageError::io(&self.path, e))?;
            }
            Sink::Bzip2(e) => {
                e.try_finish().map_err(|e| StorageError::io(&self.path, e))?;
            }
        }
        self.finished = true;
        Ok(())
    }
}

impl Drop for ByteWriter {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.try_finish() {
                tracing::error!(path = %self.path.display(), error = %e, "failed to seal stream on drop");
            }
        }
    }
}

impl std::fmt::Debug for ByteWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteWriter")
            .field("path", &self.path)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ByteReader;
    use tempfile::tempdir;

    fn read_back(path: &Path) -> Vec<u8> {
        let mut stream = ByteReader::open(path).unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read_into(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn plain_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.dat");

        let mut writer = ByteWriter::create(&path).unwrap();
        assert!(!writer.is_compressed());
        writer.write_all(b"plain bytes").unwrap();
        writer.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"plain bytes");
    }

    #[test]
    fn gzip_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.dat.gz");

        let mut writer = ByteWriter::create(&path).unwrap();
        assert!(writer.is_compressed());
        writer.write_all(b"gzip bytes").unwrap();
        writer.finish().unwrap();

        assert_eq!(read_back(&path), b"gzip bytes");
    }

    #[test]
    fn bzip2_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.dat.bz2");

        let mut writer = ByteWriter::create(&path).unwrap();
        assert!(writer.is_compressed());
        writer.write_all(b"bzip2 bytes").unwrap();
        writer.finish().unwrap();

        assert_eq!(read_back(&path), b"bzip2 bytes");
    }

    #[test]
    fn drop_seals_the_envelope() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dropped.gz");

        {
            let mut writer = ByteWriter::create(&path).unwrap();
            writer.write_all(b"sealed by drop").unwrap();
        }

        assert_eq!(read_back(&path), b"sealed by drop");
    }

    #[test]
    fn empty_write_is_fine() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.dat");

        let mut writer = ByteWriter::create(&path).unwrap();
        writer.write_all(b"").unwrap();
        writer.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = ByteWriter::create(&dir.path().join("no/such/dir/out.dat")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
