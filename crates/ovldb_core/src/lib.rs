//! # OvlDB Core
//!
//! Buffered overlap store engine for OvlDB.
//!
//! This crate provides:
//! - [`OverlapWriter`]: buffered, optionally block-compressed record output
//!   with a per-participant count side-channel for dump files
//! - [`OverlapReader`]: the mirror-image buffered reader, with random
//!   access on seekable files
//! - [`CountTable`]: the growable per-read count index and its sibling-file
//!   serialization
//! - [`StoreConfig`]: buffer sizing and compression knobs
//!
//! Handles are single-threaded and synchronous: every operation may block
//! on the underlying storage device, and a handle owns its buffers, its
//! stream and (for dump writers) its count table exclusively. Independent
//! handles on distinct files share nothing.
//!
//! Record format ([`StoreFormat`] vs [`DumpFormat`]) and payload layout are
//! type parameters, re-exported from `ovldb_codec`: a reader and a writer
//! that disagree on either do not compile.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod counts;
mod error;
mod store;

pub use config::{StoreConfig, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MIN_BUFFER_WORDS};
pub use counts::{base_path, counts_path, CountTable};
pub use error::{CoreError, CoreResult};
pub use store::{buffer_capacity, OverlapReader, OverlapWriter, Overlaps};

pub use ovldb_codec::{
    decode_record, encode_record, record_bytes, record_words, DefaultPayload, DumpFormat, Overlap,
    Payload32x5, Payload32x8, Payload64x3, PayloadCodec, ReadId, RecordFormat, StoreFormat,
};

/// Crate version, for tooling banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
