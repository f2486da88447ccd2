//! Error types for the overlap store engine.

use ovldb_storage::StorageError;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while reading or writing an overlap store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Byte-stream layer error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error outside the byte-stream layer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A compressed flush unit is damaged or does not decompress.
    ///
    /// This means the file is corrupt. It is never tolerated: a store that
    /// silently produced wrong records would corrupt every downstream
    /// consumer of the overlaps.
    #[error("{path}: block corruption: {message}")]
    BlockCorruption {
        /// Path of the damaged file.
        path: String,
        /// Description of the damage.
        message: String,
    },

    /// A count-table file is damaged.
    #[error("{path}: count table corruption: {message}")]
    CountsCorruption {
        /// Path of the damaged file.
        path: String,
        /// Description of the damage.
        message: String,
    },

    /// A seek was requested on a handle that cannot seek.
    ///
    /// Only uncompressed store files with no block compression support
    /// repositioning.
    #[error("{path}: overlap file is not seekable")]
    NotSeekable {
        /// Path of the file.
        path: String,
    },
}

impl CoreError {
    /// Creates a block-corruption error.
    pub fn block_corruption(path: &Path, message: impl Into<String>) -> Self {
        Self::BlockCorruption {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a counts-corruption error.
    pub fn counts_corruption(path: &Path, message: impl Into<String>) -> Self {
        Self::CountsCorruption {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a not-seekable error.
    pub fn not_seekable(path: &Path) -> Self {
        Self::NotSeekable {
            path: path.display().to_string(),
        }
    }
}
