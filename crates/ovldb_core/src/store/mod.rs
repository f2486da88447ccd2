//! Buffered overlap file handles.
//!
//! A handle owns one underlying byte stream and a word buffer sized so that
//! a full buffer always contains a whole number of records - in either
//! record format. That is what lets the reader treat every flush unit as
//! record-aligned without any per-unit record count on the wire.

mod reader;
mod writer;

pub use reader::{OverlapReader, Overlaps};
pub use writer::OverlapWriter;

use ovldb_codec::{record_words, DumpFormat, PayloadCodec, StoreFormat};

/// Computes the word-buffer capacity for a payload layout.
///
/// The capacity is the least common multiple of the store and dump record
/// widths, scaled up to at least `min_words`. Both handle roles use the
/// same computation, so a writer's flush units always fit a reader's
/// buffer under the same configuration.
#[must_use]
pub fn buffer_capacity<P: PayloadCodec>(min_words: usize) -> usize {
    let store_width = record_words::<StoreFormat, P>();
    let dump_width = record_words::<DumpFormat, P>();
    let unit = lcm(store_width, dump_width);
    unit * min_words.max(1).div_ceil(unit)
}

const fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

const fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

/// Re-encodes `words` as little-endian bytes into `out`.
pub(crate) fn words_to_bytes(words: &[u32], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(words.len() * 4);
    for word in words {
        out.extend_from_slice(&word.to_le_bytes());
    }
}

/// Decodes little-endian bytes into the front of `out`.
///
/// `bytes` must be a whole number of words and fit in `out`.
pub(crate) fn bytes_to_words(bytes: &[u8], out: &mut [u32]) {
    for (i, chunk) in bytes.chunks_exact(4).enumerate() {
        out[i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}
