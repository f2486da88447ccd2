//! # OvlDB Codec
//!
//! Packed overlap-record codec for OvlDB.
//!
//! This crate defines the on-disk shape of one overlap record and converts
//! between the in-memory record and its packed 32-bit word representation.
//! It is pure and stateless: all file handling lives in `ovldb_core`.
//!
//! ## Layouts
//!
//! - Payloads: [`Payload32x5`], [`Payload64x3`] (64-bit words split high
//!   half before low half on the wire), [`Payload32x8`]. Exactly one is the
//!   build's [`DefaultPayload`], selected by cargo feature.
//! - Formats: [`StoreFormat`] (second id only, first implicit from store
//!   position) and [`DumpFormat`] (both ids explicit).
//!
//! Payload layout and record format are type parameters throughout, so a
//! writer and a reader that disagree do not compile - there is no runtime
//! variant negotiation to get wrong.
//!
//! ## Usage
//!
//! ```
//! use ovldb_codec::{decode_record, encode_record, DumpFormat, Overlap, Payload32x5, ReadId};
//!
//! let overlap = Overlap::new(ReadId::new(3), ReadId::new(8), Payload32x5([1, 2, 3, 4, 5]));
//! let mut wire = [0u32; 7];
//! encode_record::<DumpFormat, _>(&overlap, &mut wire);
//!
//! let mut decoded = Overlap::default();
//! decode_record::<DumpFormat, _>(&wire, &mut decoded);
//! assert_eq!(decoded, overlap);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod format;
mod id;
mod payload;
mod record;

pub use format::{DumpFormat, RecordFormat, StoreFormat};
pub use id::ReadId;
pub use payload::{Payload32x5, Payload32x8, Payload64x3, PayloadCodec};
pub use record::{decode_record, encode_record, record_bytes, record_words, Overlap};

#[cfg(all(feature = "payload-64x3", feature = "payload-32x8"))]
compile_error!("features `payload-64x3` and `payload-32x8` are mutually exclusive");

/// The payload layout this build reads and writes by default.
///
/// Selected by the mutually-exclusive `payload-*` cargo features;
/// `payload-32x5` is the default.
#[cfg(all(feature = "payload-64x3", not(feature = "payload-32x8")))]
pub type DefaultPayload = Payload64x3;

/// The payload layout this build reads and writes by default.
///
/// Selected by the mutually-exclusive `payload-*` cargo features;
/// `payload-32x5` is the default.
#[cfg(all(feature = "payload-32x8", not(feature = "payload-64x3")))]
pub type DefaultPayload = Payload32x8;

/// The payload layout this build reads and writes by default.
///
/// Selected by the mutually-exclusive `payload-*` cargo features;
/// `payload-32x5` is the default.
#[cfg(not(any(feature = "payload-64x3", feature = "payload-32x8")))]
pub type DefaultPayload = Payload32x5;
