//! Store handle configuration.

/// Configuration for opening an overlap file handle.
///
/// The same configuration must be used for the writer and the reader of a
/// file: the buffer minimum determines the flush-unit size, and the block
/// compression flag must agree between the two ends.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Minimum word-buffer capacity, in 32-bit words. The actual capacity
    /// is this value rounded up to a common multiple of the store and dump
    /// record widths, so a full buffer always holds whole records.
    pub min_buffer_words: usize,

    /// Whether dump handles compress each flush unit as a framed block.
    /// Store handles never do.
    pub block_compression: bool,

    /// Compression level for block compression.
    pub compression_level: i32,
}

/// Default minimum buffer capacity: 16 Ki words.
pub const DEFAULT_MIN_BUFFER_WORDS: usize = 16 * 1024;

/// Default block-compression level.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            min_buffer_words: DEFAULT_MIN_BUFFER_WORDS,
            block_compression: true,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum word-buffer capacity.
    #[must_use]
    pub const fn min_buffer_words(mut self, words: usize) -> Self {
        self.min_buffer_words = words;
        self
    }

    /// Sets whether dump handles use block compression.
    #[must_use]
    pub const fn block_compression(mut self, value: bool) -> Self {
        self.block_compression = value;
        self
    }

    /// Sets the block-compression level.
    #[must_use]
    pub const fn compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }
}
