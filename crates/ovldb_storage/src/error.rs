//! Error types for stream operations.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for stream operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur on the byte-stream layer.
///
/// Every variant carries the path of the file involved so that a failure
/// deep inside a store build still names the file it happened on.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("{path}: I/O error: {source}")]
    Io {
        /// Path of the file being accessed.
        path: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A read returned fewer bytes than required.
    #[error("{path}: short read: requested {requested} bytes, got {actual}")]
    ShortRead {
        /// Path of the file being read.
        path: String,
        /// Number of bytes requested.
        requested: u64,
        /// Number of bytes actually read.
        actual: u64,
    },

    /// A write accepted fewer bytes than required.
    #[error("{path}: short write: requested {requested} bytes, wrote {actual}")]
    ShortWrite {
        /// Path of the file being written.
        path: String,
        /// Number of bytes requested.
        requested: u64,
        /// Number of bytes actually written.
        actual: u64,
    },

    /// A seek was attempted on a compressed stream.
    #[error("{path}: stream is not seekable")]
    NotSeekable {
        /// Path of the file.
        path: String,
    },

    /// The stream contents are not what the envelope promised.
    #[error("{path}: corrupted stream: {message}")]
    Corrupted {
        /// Path of the file.
        path: String,
        /// Description of the corruption.
        message: String,
    },
}

impl StorageError {
    /// Creates an I/O error carrying the file path.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a short-read error.
    pub fn short_read(path: &Path, requested: u64, actual: u64) -> Self {
        Self::ShortRead {
            path: path.display().to_string(),
            requested,
            actual,
        }
    }

    /// Creates a short-write error.
    pub fn short_write(path: &Path, requested: u64, actual: u64) -> Self {
        Self::ShortWrite {
            path: path.display().to_string(),
            requested,
            actual,
        }
    }

    /// Creates a not-seekable error.
    pub fn not_seekable(path: &Path) -> Self {
        Self::NotSeekable {
            path: path.display().to_string(),
        }
    }

    /// Creates a corruption error.
    pub fn corrupted(path: &Path, message: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}
