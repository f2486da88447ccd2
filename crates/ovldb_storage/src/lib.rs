//! # OvlDB Storage
//!
//! Transparent-compression byte streams for OvlDB.
//!
//! This crate provides the lowest-level I/O abstraction for OvlDB. Streams
//! are **opaque byte cursors** - they do not interpret the data they carry.
//!
//! ## Design Principles
//!
//! - Reading auto-detects gzip/bzip2 envelopes from magic bytes
//! - Writing selects the envelope from the file extension
//! - Short reads and writes fail loudly, naming the file and the
//!   requested vs. actual byte counts
//! - Seeking is only offered where the envelope permits it
//! - OvlDB core owns all record-format interpretation
//!
//! ## Example
//!
//! ```no_run
//! use ovldb_storage::{ByteReader, ByteWriter};
//! use std::path::Path;
//!
//! let mut out = ByteWriter::create(Path::new("data.gz")).unwrap();
//! out.write_all(b"hello").unwrap();
//! out.finish().unwrap();
//!
//! let mut input = ByteReader::open(Path::new("data.gz")).unwrap();
//! assert_eq!(input.take().unwrap(), b'h');
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod reader;
mod writer;

pub use error::{StorageError, StorageResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
